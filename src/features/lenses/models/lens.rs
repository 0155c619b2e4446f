use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for spectacle lenses
#[derive(Debug, Clone, FromRow)]
pub struct Lens {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    /// Free-form grouping such as "single_vision" or "progressive"
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub price: Decimal,
    pub in_stock: bool,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a lens listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LensSortField {
    Name,
    Brand,
    Price,
    #[default]
    CreatedAt,
}

impl LensSortField {
    pub fn column(&self) -> &'static str {
        match self {
            LensSortField::Name => "name",
            LensSortField::Brand => "brand",
            LensSortField::Price => "price",
            LensSortField::CreatedAt => "created_at",
        }
    }
}
