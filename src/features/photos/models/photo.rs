use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::types::SortOrder;

/// Presentation role of a photo, matching the `photo_category` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "photo_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PhotoCategory {
    Hero,
    ImageSlider,
    NewsCarousel,
    BrandLogo,
    StorePhoto,
    ProductPhoto,
}

impl PhotoCategory {
    pub const ALL: [PhotoCategory; 6] = [
        PhotoCategory::Hero,
        PhotoCategory::ImageSlider,
        PhotoCategory::NewsCarousel,
        PhotoCategory::BrandLogo,
        PhotoCategory::StorePhoto,
        PhotoCategory::ProductPhoto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoCategory::Hero => "hero",
            PhotoCategory::ImageSlider => "image_slider",
            PhotoCategory::NewsCarousel => "news_carousel",
            PhotoCategory::BrandLogo => "brand_logo",
            PhotoCategory::StorePhoto => "store_photo",
            PhotoCategory::ProductPhoto => "product_photo",
        }
    }
}

impl fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhotoCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Invalid photo category '{}'", s)))
    }
}

/// Optional text slots a category can make mandatory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoTextField {
    Title,
    Subtitle,
    #[serde(rename = "text_field_1")]
    TextField1,
    #[serde(rename = "text_field_2")]
    TextField2,
}

impl PhotoTextField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoTextField::Title => "title",
            PhotoTextField::Subtitle => "subtitle",
            PhotoTextField::TextField1 => "text_field_1",
            PhotoTextField::TextField2 => "text_field_2",
        }
    }
}

/// Database model for photos
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Photo {
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

impl Photo {
    /// Apply a patch in memory, used to validate an update before it is persisted
    pub fn with_changes(&self, changes: &PhotoChanges) -> Photo {
        let mut photo = self.clone();
        if let Some(url) = &changes.image_url {
            photo.image_url = url.clone();
        }
        if let Some(category) = changes.category {
            photo.category = category;
        }
        if let Some(title) = &changes.title {
            photo.title = title.clone();
        }
        if let Some(subtitle) = &changes.subtitle {
            photo.subtitle = subtitle.clone();
        }
        if let Some(text) = &changes.text_field_1 {
            photo.text_field_1 = text.clone();
        }
        if let Some(text) = &changes.text_field_2 {
            photo.text_field_2 = text.clone();
        }
        if let Some(order) = changes.display_order {
            photo.display_order = order;
        }
        if let Some(active) = changes.is_active {
            photo.is_active = active;
        }
        photo
    }
}

/// Caller-supplied metadata for a new photo (everything except the image itself)
#[derive(Debug, Clone)]
pub struct PhotoMetadata {
    pub category: PhotoCategory,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text_field_1: Option<String>,
    pub text_field_2: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl PhotoMetadata {
    pub fn new(category: PhotoCategory) -> Self {
        Self {
            category,
            title: None,
            subtitle: None,
            text_field_1: None,
            text_field_2: None,
            display_order: None,
            is_active: None,
        }
    }

    pub fn text_field(&self, field: PhotoTextField) -> Option<&str> {
        match field {
            PhotoTextField::Title => self.title.as_deref(),
            PhotoTextField::Subtitle => self.subtitle.as_deref(),
            PhotoTextField::TextField1 => self.text_field_1.as_deref(),
            PhotoTextField::TextField2 => self.text_field_2.as_deref(),
        }
    }
}

impl From<&Photo> for PhotoMetadata {
    fn from(photo: &Photo) -> Self {
        Self {
            category: photo.category,
            title: photo.title.clone(),
            subtitle: photo.subtitle.clone(),
            text_field_1: photo.text_field_1.clone(),
            text_field_2: photo.text_field_2.clone(),
            display_order: Some(photo.display_order),
            is_active: Some(photo.is_active),
        }
    }
}

/// Row values for an insert
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub image_url: String,
    pub category: PhotoCategory,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub text_field_1: Option<String>,
    pub text_field_2: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

impl NewPhoto {
    pub const DEFAULT_DISPLAY_ORDER: i32 = 0;

    pub fn from_metadata(image_url: String, metadata: PhotoMetadata) -> Self {
        Self {
            image_url,
            category: metadata.category,
            title: metadata.title,
            subtitle: metadata.subtitle,
            text_field_1: metadata.text_field_1,
            text_field_2: metadata.text_field_2,
            display_order: metadata
                .display_order
                .unwrap_or(Self::DEFAULT_DISPLAY_ORDER),
            is_active: metadata.is_active.unwrap_or(true),
        }
    }
}

/// Partial update. For text fields `Some(None)` clears the column.
#[derive(Debug, Clone, Default)]
pub struct PhotoChanges {
    pub image_url: Option<String>,
    pub category: Option<PhotoCategory>,
    pub title: Option<Option<String>>,
    pub subtitle: Option<Option<String>>,
    pub text_field_1: Option<Option<String>>,
    pub text_field_2: Option<Option<String>>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl PhotoChanges {
    pub fn image_url(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image_url.is_none()
            && self.category.is_none()
            && self.title.is_none()
            && self.subtitle.is_none()
            && self.text_field_1.is_none()
            && self.text_field_2.is_none()
            && self.display_order.is_none()
            && self.is_active.is_none()
    }
}

/// Columns a photo listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSortField {
    #[default]
    DisplayOrder,
    CreatedAt,
    UpdatedAt,
    Title,
    Category,
}

impl PhotoSortField {
    pub fn column(&self) -> &'static str {
        match self {
            PhotoSortField::DisplayOrder => "display_order",
            PhotoSortField::CreatedAt => "created_at",
            PhotoSortField::UpdatedAt => "updated_at",
            PhotoSortField::Title => "title",
            PhotoSortField::Category => "category",
        }
    }
}

/// Backend-level listing request built from the HTTP query
#[derive(Debug, Clone, Default)]
pub struct PhotoFilter {
    pub category: Option<PhotoCategory>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: PhotoSortField,
    pub sort_order: SortOrder,
    pub offset: i64,
    pub limit: i64,
}
