use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::features::photos::models::{Photo, PhotoCategory, PhotoChanges, PhotoSortField};
use crate::features::photos::services::{DeleteOutcome, PhotoListQuery};
use crate::shared::constants::{MAX_BULK_DELETE, MAX_REORDER_BATCH};
use crate::shared::types::{PaginationQuery, SortOrder};

/// Response DTO for a photo
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponseDto {
    pub id: Uuid,
    pub image_url: String,
    pub category: PhotoCategory,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text_field_1: Option<String>,
    pub text_field_2: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Photo> for PhotoResponseDto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            image_url: photo.image_url,
            category: photo.category,
            title: photo.title,
            subtitle: photo.subtitle,
            text_field_1: photo.text_field_1,
            text_field_2: photo.text_field_2,
            display_order: photo.display_order,
            is_active: photo.is_active,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

/// Create photo form for OpenAPI documentation.
/// The handler reads the multipart body field by field.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreatePhotoForm {
    /// Image file (JPG, PNG, WebP; SVG for brand_logo)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    #[schema(example = "hero")]
    pub category: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// Required for image_slider
    pub text_field_1: Option<String>,
    /// Required for image_slider
    pub text_field_2: Option<String>,
    #[schema(example = 1)]
    pub display_order: Option<i32>,
    /// Defaults to true
    #[schema(example = "true")]
    pub is_active: Option<String>,
}

/// Replace image form for OpenAPI documentation
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct ReplaceImageForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Query parameters for listing photos
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PhotoListQueryDto {
    /// Filter by category tag
    pub category: Option<PhotoCategory>,
    /// Case-insensitive match on title, subtitle and text fields
    #[param(example = "summer")]
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// Sort column (default: display_order)
    pub sort_by: Option<PhotoSortField>,
    /// Sort direction (default: asc)
    pub sort_order: Option<SortOrder>,
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page (default: 10, max: 100)
    #[serde(default = "default_per_page", alias = "perPage")]
    #[param(minimum = 1, maximum = 100)]
    pub per_page: i64,
}

fn default_page() -> i64 {
    PaginationQuery::default().page
}

fn default_per_page() -> i64 {
    PaginationQuery::default().per_page
}

impl From<PhotoListQueryDto> for PhotoListQuery {
    fn from(dto: PhotoListQueryDto) -> Self {
        Self {
            category: dto.category,
            search: dto.search,
            is_active: dto.is_active,
            sort_by: dto.sort_by.unwrap_or_default(),
            sort_order: dto.sort_order.unwrap_or_default(),
            pagination: PaginationQuery::new(dto.page, dto.per_page),
        }
    }
}

/// Request DTO for patching photo metadata.
/// Omitted fields stay unchanged; an empty string clears a text field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePhotoDto {
    pub category: Option<PhotoCategory>,
    #[validate(length(max = 255, message = "Title must not exceed 255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "Subtitle must not exceed 255 characters"))]
    pub subtitle: Option<String>,
    #[validate(length(max = 1000, message = "text_field_1 must not exceed 1000 characters"))]
    pub text_field_1: Option<String>,
    #[validate(length(max = 1000, message = "text_field_2 must not exceed 1000 characters"))]
    pub text_field_2: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdatePhotoDto> for PhotoChanges {
    fn from(dto: UpdatePhotoDto) -> Self {
        Self {
            image_url: None,
            category: dto.category,
            title: dto.title.map(Some),
            subtitle: dto.subtitle.map(Some),
            text_field_1: dto.text_field_1.map(Some),
            text_field_2: dto.text_field_2.map(Some),
            display_order: dto.display_order,
            is_active: dto.is_active,
        }
    }
}

/// Response DTO for replacing the image of a photo
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplaceImageResponseDto {
    pub photo: PhotoResponseDto,
    /// Present when the previous image could not be removed from storage
    pub warning: Option<String>,
}

/// Response DTO for deleting a photo
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletePhotoResponseDto {
    pub id: Uuid,
    pub deleted: bool,
    /// False when the image is external or could not be removed
    pub object_removed: bool,
    pub warning: Option<String>,
}

impl From<DeleteOutcome> for DeletePhotoResponseDto {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            id: outcome.id,
            deleted: true,
            object_removed: outcome.object_removed,
            warning: outcome.warning,
        }
    }
}

/// Request DTO for deleting several photos
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkDeletePhotosDto {
    #[validate(length(min = 1, max = MAX_BULK_DELETE, message = "ids must contain 1-100 entries"))]
    pub ids: Vec<Uuid>,
}

/// Per-id result of a bulk delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteItemDto {
    pub id: Uuid,
    pub deleted: bool,
    pub object_removed: bool,
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl BulkDeleteItemDto {
    pub fn from_result(id: Uuid, result: Result<DeleteOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                id,
                deleted: true,
                object_removed: outcome.object_removed,
                warning: outcome.warning,
                error: None,
            },
            Err(e) => Self {
                id,
                deleted: false,
                object_removed: false,
                warning: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResponseDto {
    pub deleted: usize,
    pub failed: usize,
    pub results: Vec<BulkDeleteItemDto>,
}

impl From<Vec<BulkDeleteItemDto>> for BulkDeleteResponseDto {
    fn from(results: Vec<BulkDeleteItemDto>) -> Self {
        let deleted = results.iter().filter(|r| r.deleted).count();
        Self {
            deleted,
            failed: results.len() - deleted,
            results,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReorderItemDto {
    pub id: Uuid,
    pub display_order: i32,
}

/// Request DTO for setting many display orders at once
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderPhotosDto {
    #[validate(length(
        min = 1,
        max = MAX_REORDER_BATCH,
        message = "items must contain 1-200 entries"
    ))]
    pub items: Vec<ReorderItemDto>,
}

impl ReorderPhotosDto {
    pub fn orders(&self) -> Vec<(Uuid, i32)> {
        self.items
            .iter()
            .map(|item| (item.id, item.display_order))
            .collect()
    }
}
