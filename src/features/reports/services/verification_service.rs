use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use crate::core::config::VerificationConfig;
use crate::core::error::{AppError, Result};

/// Dispatcher for the external verification service.
///
/// After a report is created, one notification is POSTed to the verification
/// endpoint and its outcome is discarded: success, failure or timeout never
/// alters the response already returned for the ingestion request, and the
/// insert is never rolled back. There is no retry; a dropped call is lost.
///
/// Verification is advisory only. Its result drives no status transition;
/// the moderation workflow is the sole authority over visibility.
pub struct VerificationService {
    client: Client,
    endpoint: String,
}

impl VerificationService {
    pub fn new(config: VerificationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    /// Fire a detached verification call for a freshly created report.
    ///
    /// Returns immediately; the request runs on a spawned task with no result
    /// channel back to the caller. Errors are logged and swallowed here.
    pub fn dispatch(&self, report_id: Uuid, image_url: &str) {
        if self.endpoint.is_empty() {
            tracing::debug!("Verification dispatch disabled; skipping report {}", report_id);
            return;
        }

        let client = self.client.clone();
        let url = format!("{}/check", self.endpoint);
        let image_url = image_url.to_string();

        tokio::spawn(async move {
            if let Err(e) = Self::send(&client, &url, report_id, &image_url).await {
                tracing::warn!("Verification dispatch for report {} failed: {}", report_id, e);
            }
        });
    }

    /// Perform the actual notification. Split out so the failure modes can be
    /// exercised without spawning.
    async fn send(client: &Client, url: &str, report_id: Uuid, image_url: &str) -> Result<()> {
        let response = client
            .post(url)
            .json(&json!({
                "reportId": report_id,
                "imageUrl": image_url,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        tracing::debug!("Verification service notified for report {}", report_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(endpoint: &str) -> VerificationConfig {
        VerificationConfig {
            endpoint: endpoint.to_string(),
            timeout: Duration::from_millis(200),
        }
    }

    #[tokio::test]
    async fn test_send_failure_is_an_error_not_a_panic() {
        // Nothing listens on this port; the send must fail cleanly so the
        // dispatch task can log and swallow it.
        let service = VerificationService::new(config("http://127.0.0.1:9")).unwrap();
        let err = VerificationService::send(
            &service.client,
            "http://127.0.0.1:9/check",
            Uuid::new_v4(),
            "https://cdn.example.com/img.jpg",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_dispatch_returns_without_awaiting_outcome() {
        let service = VerificationService::new(config("http://127.0.0.1:9")).unwrap();

        // The endpoint is unreachable, but dispatch must return immediately
        // and never surface the failure to the caller.
        service.dispatch(Uuid::new_v4(), "https://cdn.example.com/img.jpg");

        // Give the spawned task a moment to fail in the background.
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    #[tokio::test]
    async fn test_empty_endpoint_disables_dispatch() {
        let service = VerificationService::new(config("")).unwrap();
        service.dispatch(Uuid::new_v4(), "https://cdn.example.com/img.jpg");
    }
}
