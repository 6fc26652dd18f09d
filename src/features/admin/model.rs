use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::error::AppError;

/// Explicit moderator context injected by the bearer-token gate.
///
/// Moderation handlers take this as a parameter; there is no ambient
/// logged-in flag anywhere in the process. The gate middleware is the only
/// production code path that constructs it.
#[derive(Debug, Clone)]
pub struct Moderator {
    /// Identity recorded in log lines for the acting operator
    pub subject: String,
}

impl Moderator {
    /// Context for the single shared-token moderator. Per-operator identity
    /// is out of scope; the subject keeps moderation actions attributable in
    /// the logs.
    pub fn from_shared_token() -> Self {
        Self {
            subject: "moderator".to_string(),
        }
    }
}

impl<S> FromRequestParts<S> for Moderator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Moderator>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Moderator access required".to_string()))
    }
}
