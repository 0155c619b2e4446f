use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, ValidatedJson};
use crate::features::photos::dtos::{
    OrphanReportDto, OrphanReportQuery, RepairReportDto, RepairUrlsDto, SweepOrphansDto,
    SweepReportDto,
};
use crate::features::photos::routes::PhotoState;
use crate::shared::types::ApiResponse;

/// Report stored objects without a photo and photos without an object
#[utoipa::path(
    get,
    path = "/api/maintenance/orphans",
    tag = "maintenance",
    params(OrphanReportQuery),
    responses(
        (status = 200, description = "Orphan report", body = ApiResponse<OrphanReportDto>),
        (status = 502, description = "Object storage failure")
    )
)]
pub async fn orphan_report(
    State(state): State<PhotoState>,
    Query(query): Query<OrphanReportQuery>,
) -> Result<Json<ApiResponse<OrphanReportDto>>> {
    let report = state.maintenance.orphan_report(query.check_external).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Remove orphaned objects (dry run by default)
#[utoipa::path(
    post,
    path = "/api/maintenance/orphans/sweep",
    tag = "maintenance",
    request_body = SweepOrphansDto,
    responses(
        (status = 200, description = "Sweep result", body = ApiResponse<SweepReportDto>),
        (status = 502, description = "Object storage failure")
    )
)]
pub async fn sweep_orphans(
    State(state): State<PhotoState>,
    AppJson(dto): AppJson<SweepOrphansDto>,
) -> Result<Json<ApiResponse<SweepReportDto>>> {
    let report = state.maintenance.sweep_orphans(dto.dry_run).await?;
    let message = if report.dry_run {
        format!("{} objects would be removed", report.keys.len())
    } else {
        format!("{} objects removed", report.keys.len())
    };
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some(message),
        None,
    )))
}

/// Point photos with missing images at replacement URLs
#[utoipa::path(
    post,
    path = "/api/maintenance/repair-urls",
    tag = "maintenance",
    request_body = RepairUrlsDto,
    responses(
        (status = 200, description = "Repair result", body = ApiResponse<RepairReportDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn repair_urls(
    State(state): State<PhotoState>,
    ValidatedJson(dto): ValidatedJson<RepairUrlsDto>,
) -> Result<Json<ApiResponse<RepairReportDto>>> {
    let report = state
        .maintenance
        .repair_dangling_urls(&dto.candidates, dto.check_external)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
