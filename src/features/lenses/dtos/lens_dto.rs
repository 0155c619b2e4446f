use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::lenses::models::{Lens, LensSortField};
use crate::shared::types::{PaginationQuery, SortOrder};
use crate::shared::validation::{validate_http_url, validate_not_blank, validate_price};

const MAX_FEATURES: usize = 30;
const MAX_FEATURE_LENGTH: usize = 200;

/// Response DTO for a lens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LensResponseDto {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String, example = "1250.00")]
    pub price: Decimal,
    pub in_stock: bool,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Lens> for LensResponseDto {
    fn from(lens: Lens) -> Self {
        Self {
            id: lens.id,
            name: lens.name,
            brand: lens.brand,
            category: lens.category,
            image_url: lens.image_url,
            short_description: lens.short_description,
            description: lens.description,
            price: lens.price,
            in_stock: lens.in_stock,
            features: lens.features,
            created_at: lens.created_at,
            updated_at: lens.updated_at,
        }
    }
}

/// Query parameters for listing lenses
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct LensListQuery {
    /// Case-insensitive match on name, brand and descriptions
    #[param(example = "blue light")]
    pub search: Option<String>,
    /// Exact brand (case-insensitive)
    pub brand: Option<String>,
    /// Exact category (case-insensitive)
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    /// Sort column (default: created_at)
    pub sort_by: Option<LensSortField>,
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

impl LensListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.per_page)
    }

    pub fn sort(&self) -> (LensSortField, SortOrder) {
        (
            self.sort_by.unwrap_or_default(),
            self.sort_order.unwrap_or(SortOrder::Desc),
        )
    }
}

/// Feature bullet points: bounded list of short, non-blank entries
fn validate_features(features: &[String]) -> Result<(), ValidationError> {
    if features.len() > MAX_FEATURES {
        let mut err = ValidationError::new("too_many_features");
        err.message = Some(format!("At most {} features are allowed", MAX_FEATURES).into());
        return Err(err);
    }
    for feature in features {
        validate_not_blank(feature)?;
        if feature.chars().count() > MAX_FEATURE_LENGTH {
            let mut err = ValidationError::new("feature_length");
            err.message = Some(
                format!("Features must not exceed {} characters", MAX_FEATURE_LENGTH).into(),
            );
            return Err(err);
        }
    }
    Ok(())
}

/// Trimmed copy of a feature list
pub fn clean_features(features: Vec<String>) -> Vec<String> {
    features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect()
}

/// Request DTO for creating a lens
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLensDto {
    #[validate(
        length(min = 1, max = 255, message = "Name must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "BlueGuard 1.60")]
    pub name: String,
    #[validate(
        length(min = 1, max = 255, message = "Brand must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Hoya")]
    pub brand: String,
    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_http_url"))]
    pub image_url: Option<String>,
    #[validate(length(max = 500, message = "Short description must not exceed 500 characters"))]
    pub short_description: Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = String, example = "1250.00")]
    pub price: Decimal,
    pub in_stock: Option<bool>,
    #[validate(custom(function = "validate_features"))]
    pub features: Option<Vec<String>>,
}

/// Request DTO for patching a lens. Omitted fields stay unchanged; an empty
/// string clears an optional text column and `features` replaces the list.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLensDto {
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
    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[validate(length(max = 500, message = "Short description must not exceed 500 characters"))]
    pub short_description: Option<String>,
    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "1250.00")]
    pub price: Option<Decimal>,
    pub in_stock: Option<bool>,
    #[validate(custom(function = "validate_features"))]
    pub features: Option<Vec<String>>,
}

impl UpdateLensDto {
    /// Non-empty image URLs must be absolute
    pub fn check_image_url(&self) -> Result<(), ValidationError> {
        match self.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => validate_http_url(url),
            _ => Ok(()),
        }
    }
}
