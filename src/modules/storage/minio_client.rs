//! MinIO/S3-compatible storage client for report images
//!
//! Owns object-key generation for uploaded report photos and derives the
//! stable public URL citizens and the feed read from. Uses the rust-s3 crate
//! for lightweight S3 operations.

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
    access_key: String,
    secret_key: String,
    region_name: String,
    http_client: Client,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration.
    ///
    /// Construction performs no network I/O; call [`ensure_bucket_exists`]
    /// and [`set_public_read_policy`] during startup.
    ///
    /// [`ensure_bucket_exists`]: MinIOClient::ensure_bucket_exists
    /// [`set_public_read_policy`]: MinIOClient::set_public_read_policy
    pub fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
            access_key: config.access_key,
            secret_key: config.secret_key,
            region_name: config.region,
            http_client,
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let bucket_config = BucketConfiguration::default();

        match Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            bucket_config,
        )
        .await
        {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                // Bucket already exists - this is fine
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                    Ok(())
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                    Ok(())
                }
            }
        }
    }

    /// Allow anonymous reads on the public prefix so image URLs work without
    /// credentials. Tolerates failure: a pre-provisioned bucket keeps working
    /// and the policy can be set manually with
    /// `mc anonymous set download minio/<bucket>/<prefix>`.
    pub async fn set_public_read_policy(&self) -> Result<(), AppError> {
        let bucket_name = self.bucket.name();
        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": {"AWS": "*"},
                    "Action": ["s3:GetObject"],
                    "Resource": [format!("arn:aws:s3:::{}/{}/*", bucket_name, self.public_prefix)]
                }
            ]
        });

        match self
            .put_bucket_policy(&bucket_name, &policy.to_string())
            .await
        {
            Ok(_) => {
                info!(
                    "Set public read policy for {}/{}/*",
                    bucket_name, self.public_prefix
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to set bucket policy for '{}': {}. \
                    Set it manually with: mc anonymous set download minio/{}/{}",
                    bucket_name, e, bucket_name, self.public_prefix
                );
                Ok(())
            }
        }
    }

    /// PUT the bucket policy, signing the request with AWS Signature v4.
    /// rust-s3 has no policy API, so the request is built by hand.
    async fn put_bucket_policy(&self, bucket_name: &str, policy: &str) -> Result<(), AppError> {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| AppError::Internal(format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| AppError::Internal("Endpoint URL has no host".to_string()))?;
        let host_header = match endpoint_url.port() {
            Some(p) => format!("{}:{}", host, p),
            None => host.to_string(),
        };

        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";

        let canonical_request = format!(
            "PUT\n/{}\npolicy=\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
            bucket_name, host_header, payload_hash, amz_date, signed_headers, payload_hash
        );

        let credential_scope = format!("{}/{}/s3/aws4_request", date_stamp, self.region_name);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            credential_scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signature = self.sign_v4(&date_stamp, &string_to_sign)?;
        let authorization_header = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, credential_scope, signed_headers, signature
        );

        let url = format!("{}/{}?policy", self.endpoint, bucket_name);
        let response = self
            .http_client
            .put(&url)
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", &authorization_header)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send policy request: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::Internal(format!(
                "Failed to set bucket policy: {} - {}",
                status, body
            )))
        }
    }

    /// Derive the AWS Signature v4 signing key chain and sign `string_to_sign`
    fn sign_v4(&self, date_stamp: &str, string_to_sign: &str) -> Result<String, AppError> {
        let k_date = Self::hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            date_stamp.as_bytes(),
        )?;
        let k_region = Self::hmac_sha256(&k_date, self.region_name.as_bytes())?;
        let k_service = Self::hmac_sha256(&k_region, b"s3")?;
        let k_signing = Self::hmac_sha256(&k_service, b"aws4_request")?;

        let signature = Self::hmac_sha256(&k_signing, string_to_sign.as_bytes())?;
        Ok(hex::encode(signature))
    }

    fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AppError> {
        let mut mac = HmacSha256::new_from_slice(key)
            .map_err(|e| AppError::Internal(format!("HMAC key error: {}", e)))?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Map a declared image content type to the extension stored with the
    /// object. Client-supplied filenames are never consulted.
    pub fn image_extension_for(content_type: &str) -> Option<&'static str> {
        match content_type {
            "image/jpeg" => Some("jpg"),
            "image/png" => Some("png"),
            "image/webp" => Some("webp"),
            "image/gif" => Some("gif"),
            _ => None,
        }
    }

    /// Generate a collision-resistant object key for a report image.
    ///
    /// Combines a millisecond timestamp with a random UUID so concurrent
    /// submissions cannot collide: `public/reports/{millis}-{uuid}.{ext}`
    pub fn generate_report_key(&self, extension: &str) -> String {
        format!(
            "{}/reports/{}-{}.{}",
            self.public_prefix,
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            extension
        )
    }

    /// Upload a report image and return its stable public URL.
    ///
    /// Fails with [`AppError::Upload`] on any backend failure; the caller
    /// must not insert a report row when this fails.
    pub async fn upload_report_image(
        &self,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let extension = Self::image_extension_for(content_type)
            .ok_or_else(|| AppError::Upload(format!("Unsupported image type: {}", content_type)))?;

        let key = self.generate_report_key(extension);

        self.bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Upload(format!("Failed to upload image '{}': {}", key, e)))?;

        debug!("Uploaded image '{}' to bucket '{}'", key, self.bucket.name());
        Ok(self.get_public_url(&key))
    }

    /// Delete an object from the storage
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete object '{}': {}", key, e)))?;

        debug!(
            "Deleted object '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Pure derivation of the public URL for an object key
    pub fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    /// Extract the object key from a URL previously issued by this client.
    ///
    /// Returns `None` when the URL does not match this client's endpoints and
    /// bucket (e.g. a row migrated from another store).
    pub fn extract_key_from_url(&self, url: &str) -> Option<String> {
        for base in [&self.public_endpoint, &self.endpoint] {
            let prefix = format!("{}/{}/", base, self.bucket.name());
            if let Some(key) = url.strip_prefix(&prefix) {
                return Some(key.to_string());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> MinIOClient {
        MinIOClient::new(MinIOConfig {
            endpoint: "http://localhost:9000".to_string(),
            public_endpoint: "https://cdn.example.com".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "roadwatch-reports".to_string(),
            region: "us-east-1".to_string(),
            public_prefix: "public".to_string(),
        })
        .expect("client construction is offline")
    }

    #[test]
    fn test_image_extension_mapping() {
        assert_eq!(MinIOClient::image_extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(MinIOClient::image_extension_for("image/png"), Some("png"));
        assert_eq!(MinIOClient::image_extension_for("image/webp"), Some("webp"));
        assert_eq!(MinIOClient::image_extension_for("image/gif"), Some("gif"));
        assert_eq!(MinIOClient::image_extension_for("application/pdf"), None);
        assert_eq!(MinIOClient::image_extension_for("evil/../../etc"), None);
    }

    #[test]
    fn test_generate_report_key_shape_and_uniqueness() {
        let client = test_client();
        let a = client.generate_report_key("jpg");
        let b = client.generate_report_key("jpg");

        assert!(a.starts_with("public/reports/"));
        assert!(a.ends_with(".jpg"));
        // The random suffix keeps concurrent submissions apart even within
        // the same millisecond
        assert_ne!(a, b);
    }

    #[test]
    fn test_public_url_roundtrip() {
        let client = test_client();
        let key = "public/reports/1722700000000-abc.jpg";
        let url = client.get_public_url(key);

        assert_eq!(
            url,
            "https://cdn.example.com/roadwatch-reports/public/reports/1722700000000-abc.jpg"
        );
        assert_eq!(client.extract_key_from_url(&url), Some(key.to_string()));
    }

    #[test]
    fn test_extract_key_from_foreign_url() {
        let client = test_client();
        assert_eq!(
            client.extract_key_from_url("https://other.example.com/some/bucket/key.jpg"),
            None
        );
    }
}
