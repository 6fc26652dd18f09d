use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::dashboard::services::DashboardService;
use crate::features::reports::dtos::ReportResponseDto;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List approved reports for the public feed
///
/// Same shape and pagination contract as the moderator listing, but only
/// approved reports are ever returned. No authentication required.
#[utoipa::path(
    get,
    path = "/api/dashboard/reports",
    tag = "dashboard",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paginated approved reports, newest first", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reports(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let (reports, total) = service.list_approved(&params).await?;

    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}
