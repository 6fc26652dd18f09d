use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::dashboard::handlers as dashboard_handlers;
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports (public ingestion)
        reports_handlers::report_handler::create_report,
        // Dashboard (public feed)
        dashboard_handlers::list_reports,
        // Admin (moderation)
        admin_handlers::list_reports,
        admin_handlers::get_report,
        admin_handlers::update_report_status,
        admin_handlers::delete_report,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Reports
            reports_models::ReportStatus,
            reports_models::IssueCategory,
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::UpdateReportStatusDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Admin
            admin_dtos::DeleteReportResponseDto,
            ApiResponse<admin_dtos::DeleteReportResponseDto>,
        )
    ),
    tags(
        (name = "reports", description = "Citizen report submission (public)"),
        (name = "dashboard", description = "Public feed of approved reports"),
        (name = "admin", description = "Moderation endpoints (shared bearer token)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "RoadWatch API",
        version = "0.1.0",
        description = "API documentation for RoadWatch",
    )
)]
pub struct ApiDoc;

/// Adds the shared-token bearer security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Moderator shared token"))
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
