//! Storage module for report images
//!
//! Provides the MinIO/S3-compatible client that owns image uploads,
//! object-key generation and public URL derivation.

mod minio_client;

pub use minio_client::MinIOClient;
