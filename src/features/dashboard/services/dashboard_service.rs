use std::sync::Arc;

use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportStatus};
use crate::features::reports::services::ReportService;
use crate::shared::types::PaginationQuery;

/// Public read gateway over the report repository.
///
/// The approved-only filter is pinned here as a hard filter: no caller of
/// this service can widen it, and no presentation layer is trusted to narrow
/// a fuller dump for display. Pending and rejected reports are invisible to
/// the feed by construction.
pub struct DashboardService {
    reports: Arc<ReportService>,
}

impl DashboardService {
    pub fn new(reports: Arc<ReportService>) -> Self {
        Self { reports }
    }

    /// List approved reports, newest first. Returns (reports, total_count).
    pub async fn list_approved(&self, params: &PaginationQuery) -> Result<(Vec<Report>, i64)> {
        self.reports
            .list(Some(ReportStatus::Approved), params.limit(), params.offset())
            .await
    }
}
