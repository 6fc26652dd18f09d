use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::ValidatedSubmission;
use crate::features::reports::models::{NewReport, Report, ReportStatus};
use crate::modules::storage::MinIOClient;
use crate::shared::constants::DEFAULT_GOVERNING_BODY;

/// Sole owner of report persistence.
///
/// Every insert, select, update and delete against the `reports` table goes
/// through this service. All operations are single-row; reports are
/// independent aggregates and concurrent status updates are last-writer-wins.
pub struct ReportService {
    pool: PgPool,
    minio_client: Arc<MinIOClient>,
}

impl ReportService {
    pub fn new(pool: PgPool, minio_client: Arc<MinIOClient>) -> Self {
        Self { pool, minio_client }
    }

    /// Create a report from a validated submission: upload the image, then
    /// insert the row with status `pending`.
    ///
    /// The upload strictly precedes the insert. When the upload fails the
    /// submission is aborted before any database write, so a persisted report
    /// always has a stored image behind its URL.
    pub async fn create(&self, submission: ValidatedSubmission) -> Result<Report> {
        let image_url = self
            .minio_client
            .upload_report_image(submission.image.data, &submission.image.content_type)
            .await?;

        let data = NewReport {
            image_url,
            location: submission.location,
            lat: submission.lat,
            lng: submission.lng,
            category: submission.category,
            impact_level: submission.impact_level,
            governing_body: DEFAULT_GOVERNING_BODY.to_string(),
        };

        self.insert(&data).await
    }

    /// Insert a new report row. The server assigns id, status (`pending`) and
    /// created_at.
    pub async fn insert(&self, data: &NewReport) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (image_url, location, lat, lng, category, impact_level, governing_body)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                id, image_url, location, lat, lng, category, impact_level,
                governing_body, status, created_at
            "#,
        )
        .bind(&data.image_url)
        .bind(&data.location)
        .bind(data.lat)
        .bind(data.lng)
        .bind(data.category)
        .bind(data.impact_level)
        .bind(&data.governing_body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Created report {} ({}, level {}) at '{}'",
            report.id,
            report.category,
            report.impact_level,
            report.location
        );

        Ok(report)
    }

    /// List reports newest first, optionally filtered by status.
    /// Returns (reports, total_count).
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Report>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
            "#,
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::Database(e)
        })?;

        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, image_url, location, lat, lng, category, impact_level,
                governing_body, status, created_at
            FROM reports
            WHERE ($1::report_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(status)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reports, total))
    }

    /// Get report by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        sqlx::query_as::<_, Report>(
            r#"
            SELECT
                id, image_url, location, lat, lng, category, impact_level,
                governing_body, status, created_at
            FROM reports
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get report: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Set the status of a report.
    ///
    /// Any of the three statuses may be set at any time; repeating the current
    /// status is a no-op success, not an error.
    pub async fn update_status(&self, id: Uuid, status: ReportStatus) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET status = $2
            WHERE id = $1
            RETURNING
                id, image_url, location, lat, lng, category, impact_level,
                governing_body, status, created_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report status: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        tracing::info!("Report {} status set to {}", id, status);
        Ok(report)
    }

    /// Permanently delete a report. Only `rejected` rows may be deleted; the
    /// precondition is checked against the current row and repeated inside
    /// the DELETE statement so a concurrent status change cannot slip a
    /// non-rejected row through.
    ///
    /// A repeated delete of the same id is a not-found failure, not a silent
    /// success.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let report = self.get_by_id(id).await?;

        if !report.status.is_deletable() {
            return Err(AppError::InvalidState(format!(
                "Report {} is {}; only rejected reports can be deleted",
                id, report.status
            )));
        }

        let result = sqlx::query("DELETE FROM reports WHERE id = $1 AND status = 'rejected'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete report: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            // The row changed between the read and the delete
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Deleted report {}", id);

        // Best-effort cleanup of the image object; the row is already gone and
        // a storage failure must not surface to the moderator.
        if let Some(key) = self.minio_client.extract_key_from_url(&report.image_url) {
            if let Err(e) = self.minio_client.delete(&key).await {
                tracing::warn!("Failed to delete image '{}' for report {}: {}", key, id, e);
            }
        }

        Ok(())
    }
}
