use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::reports::dtos::MAX_IMAGE_SIZE;
use crate::features::reports::handlers::{report_handler, ReportState};
use crate::features::reports::services::{ReportService, VerificationService};

/// Create routes for citizen report submission (public)
pub fn routes(
    report_service: Arc<ReportService>,
    verification_service: Arc<VerificationService>,
) -> Router {
    let state = ReportState {
        report_service,
        verification_service,
    };

    Router::new()
        .route(
            "/api/reports",
            // Body limit leaves headroom for multipart overhead so an image
            // just over the ceiling is rejected by the validator with 413,
            // not by the framework
            post(report_handler::create_report)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(state)
}
