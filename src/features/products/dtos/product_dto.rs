use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::products::models::{Product, ProductSortField};
use crate::shared::types::{PaginationQuery, SortOrder};
use crate::shared::validation::{validate_http_url, validate_not_blank};

/// Response DTO for a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub image_url: Option<String>,
    pub photo_id: Option<Uuid>,
    pub description: Option<String>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            brand: product.brand,
            image_url: product.image_url,
            photo_id: product.photo_id,
            description: product.description,
            in_stock: product.in_stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Query parameters for listing products
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Case-insensitive match on name, brand and description
    #[param(example = "aviator")]
    pub search: Option<String>,
    /// Exact brand (case-insensitive)
    pub brand: Option<String>,
    pub in_stock: Option<bool>,
    /// Sort column (default: created_at)
    pub sort_by: Option<ProductSortField>,
    /// Sort direction (default: desc)
    pub sort_order: Option<SortOrder>,
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
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

impl ProductListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.per_page)
    }

    pub fn sort(&self) -> (ProductSortField, SortOrder) {
        (
            self.sort_by.unwrap_or_default(),
            self.sort_order.unwrap_or(SortOrder::Desc),
        )
    }
}

/// Request DTO for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Aviator Classic")]
    pub name: String,
    #[validate(
        length(min = 1, max = 255, message = "Brand must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Ray-Ban")]
    pub brand: String,
    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,
    /// Product photo to take the image from when `image_url` is omitted
    pub photo_id: Option<Uuid>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    pub in_stock: Option<bool>,
}

/// Request DTO for patching a product. Omitted fields stay unchanged;
/// an empty string clears `image_url` or `description`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 255, message = "Brand must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<Uuid>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    pub in_stock: Option<bool>,
}

impl UpdateProductDto {
    /// Non-empty image URLs must be absolute
    pub fn check_image_url(&self) -> Result<(), validator::ValidationError> {
        match self.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => validate_http_url(url),
            _ => Ok(()),
        }
    }
}
