use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ValidatedJson;
use crate::features::photos::dtos::{
    BulkDeleteItemDto, BulkDeletePhotosDto, BulkDeleteResponseDto, CreatePhotoForm,
    DeletePhotoResponseDto, PhotoListQueryDto, PhotoResponseDto, ReorderPhotosDto,
    ReplaceImageForm, ReplaceImageResponseDto, UpdatePhotoDto,
};
use crate::features::photos::models::{PhotoCategory, PhotoMetadata};
use crate::features::photos::routes::PhotoState;
use crate::features::photos::services::PhotoUpload;
use crate::shared::types::{ApiResponse, Meta, Page};

/// Fields collected from a multipart photo form
#[derive(Default)]
struct PhotoForm {
    upload: Option<PhotoUpload>,
    fields: HashMap<String, String>,
}

impl PhotoForm {
    fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn take_upload(&mut self) -> Result<PhotoUpload> {
        self.upload
            .take()
            .ok_or_else(|| AppError::BadRequest("File is required".to_string()))
    }

    fn display_order(&self) -> Result<Option<i32>> {
        match self.text("display_order").map(|v| v.trim().to_string()) {
            None => Ok(None),
            Some(v) if v.is_empty() => Ok(None),
            Some(v) => v.parse::<i32>().map(Some).map_err(|_| {
                AppError::Validation(format!("display_order must be an integer, got '{}'", v))
            }),
        }
    }

    /// Absent means "use the default"; anything but a false-like value is true
    fn is_active(&self) -> Option<bool> {
        self.text("is_active").map(|v| {
            !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "off" | "no"
            )
        })
    }
}

async fn read_photo_form(mut multipart: Multipart) -> Result<PhotoForm> {
    let mut form = PhotoForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unnamed".to_string());
            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            form.upload = Some(PhotoUpload {
                data: data.to_vec(),
                content_type,
                filename,
            });
        } else if !name.is_empty() {
            let text = field.text().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
            })?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

/// List photos
///
/// Filter by category, activity and free text, sorted and paginated.
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    params(PhotoListQueryDto),
    responses(
        (status = 200, description = "Page of photos", body = ApiResponse<Page<PhotoResponseDto>>),
        (status = 400, description = "Invalid query")
    )
)]
pub async fn list_photos(
    State(state): State<PhotoState>,
    Query(query): Query<PhotoListQueryDto>,
) -> Result<Json<ApiResponse<Page<PhotoResponseDto>>>> {
    let page = state.queries.list(&query.into()).await?;
    let total = page.total;
    Ok(Json(ApiResponse::success(
        Some(page.map(Into::into)),
        None,
        Some(Meta { total }),
    )))
}

/// Upload a new photo
///
/// Accepts multipart/form-data. The image is stored first, then the row is
/// written; a failed write removes the stored image again.
#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "photos",
    request_body(
        content = CreatePhotoForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Photo created", body = ApiResponse<PhotoResponseDto>),
        (status = 400, description = "Invalid file or missing required field"),
        (status = 413, description = "Request body too large"),
        (status = 502, description = "Object storage failure")
    )
)]
pub async fn create_photo(
    State(state): State<PhotoState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PhotoResponseDto>>)> {
    let mut form = read_photo_form(multipart).await?;

    let category: PhotoCategory = form
        .text("category")
        .ok_or_else(|| AppError::Validation("category is required".to_string()))?
        .trim()
        .parse()?;

    let metadata = PhotoMetadata {
        category,
        title: form.text("title"),
        subtitle: form.text("subtitle"),
        text_field_1: form.text("text_field_1"),
        text_field_2: form.text("text_field_2"),
        display_order: form.display_order()?,
        is_active: form.is_active(),
    };
    let upload = form.take_upload()?;

    let photo = state.transactions.create(upload, metadata).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(photo.into()),
            Some("Photo uploaded successfully".to_string()),
            None,
        )),
    ))
}

/// Active photos of one category, in display order
#[utoipa::path(
    get,
    path = "/api/photos/category/{category}",
    tag = "photos",
    params(("category" = String, Path, description = "Category tag, e.g. hero")),
    responses(
        (status = 200, description = "Active photos", body = ApiResponse<Vec<PhotoResponseDto>>),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn list_photos_by_category(
    State(state): State<PhotoState>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<PhotoResponseDto>>>> {
    let category: PhotoCategory = category.parse()?;
    let photos = state.queries.list_active_by_category(category).await?;
    let total = photos.len() as i64;
    let dtos: Vec<PhotoResponseDto> = photos.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a photo by id
#[utoipa::path(
    get,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo", body = ApiResponse<PhotoResponseDto>),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn get_photo(
    State(state): State<PhotoState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PhotoResponseDto>>> {
    let photo = state.queries.get(id).await?;
    Ok(Json(ApiResponse::success(Some(photo.into()), None, None)))
}

/// Update photo metadata
#[utoipa::path(
    put,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    request_body = UpdatePhotoDto,
    responses(
        (status = 200, description = "Photo updated", body = ApiResponse<PhotoResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn update_photo(
    State(state): State<PhotoState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePhotoDto>,
) -> Result<Json<ApiResponse<PhotoResponseDto>>> {
    let photo = state.transactions.update(id, dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(photo.into()),
        Some("Photo updated successfully".to_string()),
        None,
    )))
}

/// Replace the image of a photo
#[utoipa::path(
    put,
    path = "/api/photos/{id}/image",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    request_body(
        content = ReplaceImageForm,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Image replaced", body = ApiResponse<ReplaceImageResponseDto>),
        (status = 400, description = "Invalid file"),
        (status = 404, description = "Photo not found"),
        (status = 502, description = "Object storage failure")
    )
)]
pub async fn replace_photo_image(
    State(state): State<PhotoState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ReplaceImageResponseDto>>> {
    let upload = read_photo_form(multipart).await?.take_upload()?;
    let outcome = state.transactions.replace_image(id, upload).await?;

    Ok(Json(ApiResponse::success(
        Some(ReplaceImageResponseDto {
            photo: outcome.photo.into(),
            warning: outcome.warning,
        }),
        Some("Image replaced successfully".to_string()),
        None,
    )))
}

/// Delete a photo and its image
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "photos",
    params(("id" = Uuid, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Photo deleted", body = ApiResponse<DeletePhotoResponseDto>),
        (status = 404, description = "Photo not found")
    )
)]
pub async fn delete_photo(
    State(state): State<PhotoState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletePhotoResponseDto>>> {
    let outcome = state.transactions.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(outcome.into()),
        Some("Photo deleted successfully".to_string()),
        None,
    )))
}

/// Delete several photos; each id succeeds or fails on its own
#[utoipa::path(
    post,
    path = "/api/photos/bulk-delete",
    tag = "photos",
    request_body = BulkDeletePhotosDto,
    responses(
        (status = 200, description = "Per-id results", body = ApiResponse<BulkDeleteResponseDto>),
        (status = 400, description = "Validation error")
    )
)]
pub async fn bulk_delete_photos(
    State(state): State<PhotoState>,
    ValidatedJson(dto): ValidatedJson<BulkDeletePhotosDto>,
) -> Result<Json<ApiResponse<BulkDeleteResponseDto>>> {
    let results: Vec<BulkDeleteItemDto> = state
        .transactions
        .delete_many(&dto.ids)
        .await
        .into_iter()
        .map(|(id, result)| BulkDeleteItemDto::from_result(id, result))
        .collect();

    Ok(Json(ApiResponse::success(Some(results.into()), None, None)))
}

/// Set display orders for many photos in one transaction
#[utoipa::path(
    put,
    path = "/api/photos/order",
    tag = "photos",
    request_body = ReorderPhotosDto,
    responses(
        (status = 200, description = "Order saved"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Unknown photo id, nothing changed")
    )
)]
pub async fn reorder_photos(
    State(state): State<PhotoState>,
    ValidatedJson(dto): ValidatedJson<ReorderPhotosDto>,
) -> Result<Json<ApiResponse<()>>> {
    state.transactions.reorder(&dto.orders()).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Photo order saved".to_string()),
        None,
    )))
}
