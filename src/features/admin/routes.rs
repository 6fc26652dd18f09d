use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::admin::handlers;
use crate::features::reports::services::ReportService;

/// Moderation routes, nested under /api/admin by the caller.
///
/// The bearer-token gate is applied as a route layer around this router; the
/// handlers themselves consume the injected moderator context.
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/reports", get(handlers::list_reports))
        .route(
            "/reports/{id}",
            get(handlers::get_report).delete(handlers::delete_report),
        )
        .route("/reports/{id}/status", patch(handlers::update_report_status))
        .with_state(report_service)
}
