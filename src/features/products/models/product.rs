use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for catalog products
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub image_url: Option<String>,
    /// Product photo the image was picked from
    pub photo_id: Option<Uuid>,
    pub description: Option<String>,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a product listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
    Name,
    Brand,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl ProductSortField {
    pub fn column(&self) -> &'static str {
        match self {
            ProductSortField::Name => "name",
            ProductSortField::Brand => "brand",
            ProductSortField::CreatedAt => "created_at",
            ProductSortField::UpdatedAt => "updated_at",
        }
    }
}
