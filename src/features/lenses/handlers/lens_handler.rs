use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::lenses::dtos::{CreateLensDto, LensListQuery, LensResponseDto, UpdateLensDto};
use crate::features::lenses::services::LensService;
use crate::shared::types::{ApiResponse, Meta, Page};

/// List lenses
#[utoipa::path(
    get,
    path = "/api/lenses",
    params(LensListQuery),
    responses(
        (status = 200, description = "Page of lenses", body = ApiResponse<Page<LensResponseDto>>),
    ),
    tag = "lenses"
)]
pub async fn list_lenses(
    State(service): State<Arc<LensService>>,
    Query(query): Query<LensListQuery>,
) -> Result<Json<ApiResponse<Page<LensResponseDto>>>> {
    let page = service.list(&query).await?;
    let total = page.total;
    Ok(Json(ApiResponse::success(
        Some(page.map(Into::into)),
        None,
        Some(Meta { total }),
    )))
}

/// Get lens by id
#[utoipa::path(
    get,
    path = "/api/lenses/{id}",
    params(("id" = Uuid, Path, description = "Lens id")),
    responses(
        (status = 200, description = "Lens found", body = ApiResponse<LensResponseDto>),
        (status = 404, description = "Lens not found")
    ),
    tag = "lenses"
)]
pub async fn get_lens(
    State(service): State<Arc<LensService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LensResponseDto>>> {
    let lens = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(lens.into()), None, None)))
}

/// Create a lens
#[utoipa::path(
    post,
    path = "/api/lenses",
    request_body = CreateLensDto,
    responses(
        (status = 201, description = "Lens created", body = ApiResponse<LensResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "lenses"
)]
pub async fn create_lens(
    State(service): State<Arc<LensService>>,
    ValidatedJson(dto): ValidatedJson<CreateLensDto>,
) -> Result<(StatusCode, Json<ApiResponse<LensResponseDto>>)> {
    let lens = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(lens.into()),
            Some("Lens created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a lens
#[utoipa::path(
    put,
    path = "/api/lenses/{id}",
    params(("id" = Uuid, Path, description = "Lens id")),
    request_body = UpdateLensDto,
    responses(
        (status = 200, description = "Lens updated", body = ApiResponse<LensResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Lens not found")
    ),
    tag = "lenses"
)]
pub async fn update_lens(
    State(service): State<Arc<LensService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLensDto>,
) -> Result<Json<ApiResponse<LensResponseDto>>> {
    dto.check_image_url()
        .map_err(|_| AppError::Validation("image_url must be an absolute http(s) URL".to_string()))?;

    let lens = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(lens.into()),
        Some("Lens updated successfully".to_string()),
        None,
    )))
}

/// Delete a lens
#[utoipa::path(
    delete,
    path = "/api/lenses/{id}",
    params(("id" = Uuid, Path, description = "Lens id")),
    responses(
        (status = 200, description = "Lens deleted"),
        (status = 404, description = "Lens not found")
    ),
    tag = "lenses"
)]
pub async fn delete_lens(
    State(service): State<Arc<LensService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Lens deleted successfully".to_string()),
        None,
    )))
}
