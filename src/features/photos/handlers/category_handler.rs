use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::photos::dtos::{CategoryDescriptorDto, CategoryStatsDto};
use crate::features::photos::routes::PhotoState;
use crate::features::photos::services::CategoryRegistry;
use crate::shared::types::ApiResponse;

/// List photo categories and what each accepts
#[utoipa::path(
    get,
    path = "/api/photo-categories",
    tag = "photo-categories",
    responses(
        (status = 200, description = "Category descriptors", body = ApiResponse<Vec<CategoryDescriptorDto>>)
    )
)]
pub async fn list_categories(
    State(state): State<PhotoState>,
) -> Result<Json<ApiResponse<Vec<CategoryDescriptorDto>>>> {
    let dtos: Vec<CategoryDescriptorDto> = CategoryRegistry::all()
        .iter()
        .map(|descriptor| {
            CategoryDescriptorDto::new(
                descriptor,
                state
                    .transactions
                    .effective_max_file_size(descriptor.category),
            )
        })
        .collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Active photo counts per category against their soft caps
#[utoipa::path(
    get,
    path = "/api/photo-categories/stats",
    tag = "photo-categories",
    responses(
        (status = 200, description = "Category statistics", body = ApiResponse<Vec<CategoryStatsDto>>)
    )
)]
pub async fn category_stats(
    State(state): State<PhotoState>,
) -> Result<Json<ApiResponse<Vec<CategoryStatsDto>>>> {
    let stats = state.queries.category_stats().await?;
    let dtos: Vec<CategoryStatsDto> = stats.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}
