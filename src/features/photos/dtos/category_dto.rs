use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::photos::models::{PhotoCategory, PhotoTextField};
use crate::features::photos::services::{CategoryDescriptor, CategoryStats, ImageFormat};

/// Response DTO describing what a category accepts
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDescriptorDto {
    pub category: PhotoCategory,
    pub name: String,
    pub description: String,
    /// Advisory maximum of active photos
    pub max_count: i64,
    #[schema(example = "1920x1080")]
    pub recommended_size: String,
    pub recommended_width: u32,
    pub recommended_height: u32,
    pub supported_formats: Vec<ImageFormat>,
    pub accepted_mime_types: Vec<String>,
    pub required_fields: Vec<PhotoTextField>,
    /// Upload limit in bytes
    pub max_file_size: usize,
}

impl CategoryDescriptorDto {
    /// `max_file_size` is the limit actually enforced, which may be below the category's own
    pub fn new(descriptor: &CategoryDescriptor, max_file_size: usize) -> Self {
        Self {
            category: descriptor.category,
            name: descriptor.name.to_string(),
            description: descriptor.description.to_string(),
            max_count: descriptor.max_count,
            recommended_size: descriptor.recommended_size(),
            recommended_width: descriptor.recommended_width,
            recommended_height: descriptor.recommended_height,
            supported_formats: descriptor.supported_formats.to_vec(),
            accepted_mime_types: descriptor
                .accepted_mime_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
            required_fields: descriptor.required_fields.to_vec(),
            max_file_size,
        }
    }
}

/// Response DTO for per-category counts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryStatsDto {
    pub category: PhotoCategory,
    pub name: String,
    /// Active photos in the category
    pub count: i64,
    pub max_count: i64,
    pub remaining: i64,
    pub over_capacity: bool,
}

impl From<CategoryStats> for CategoryStatsDto {
    fn from(stats: CategoryStats) -> Self {
        Self {
            category: stats.category,
            name: stats.name.to_string(),
            count: stats.count,
            max_count: stats.max_count,
            remaining: stats.remaining,
            over_capacity: stats.over_capacity,
        }
    }
}
