//! Static per-category constraints for photos

use serde::Serialize;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::{PhotoCategory, PhotoMetadata, PhotoTextField};

/// Image formats accepted by at least one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum ImageFormat {
    #[serde(rename = "JPG")]
    Jpg,
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "WebP")]
    WebP,
    #[serde(rename = "SVG")]
    Svg,
}

impl ImageFormat {
    pub fn mime_types(&self) -> &'static [&'static str] {
        match self {
            ImageFormat::Jpg => &["image/jpeg", "image/jpg"],
            ImageFormat::Png => &["image/png"],
            ImageFormat::WebP => &["image/webp"],
            ImageFormat::Svg => &["image/svg+xml"],
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        [
            ImageFormat::Jpg,
            ImageFormat::Png,
            ImageFormat::WebP,
            ImageFormat::Svg,
        ]
        .into_iter()
        .find(|format| format.mime_types().contains(&essence.as_str()))
    }
}

/// Static configuration for one category
#[derive(Debug, Clone, Copy)]
pub struct CategoryDescriptor {
    pub category: PhotoCategory,
    pub name: &'static str,
    pub description: &'static str,
    /// Soft cap on active rows, advisory only
    pub max_count: i64,
    pub recommended_width: u32,
    pub recommended_height: u32,
    pub supported_formats: &'static [ImageFormat],
    pub required_fields: &'static [PhotoTextField],
    pub max_file_size: usize,
}

impl CategoryDescriptor {
    pub fn recommended_size(&self) -> String {
        format!("{}x{}", self.recommended_width, self.recommended_height)
    }

    pub fn accepts(&self, format: ImageFormat) -> bool {
        self.supported_formats.contains(&format)
    }

    pub fn accepted_mime_types(&self) -> Vec<&'static str> {
        self.supported_formats
            .iter()
            .flat_map(|f| f.mime_types().iter().copied())
            .collect()
    }
}

const RASTER: &[ImageFormat] = &[ImageFormat::Jpg, ImageFormat::Png, ImageFormat::WebP];
const RASTER_AND_SVG: &[ImageFormat] = &[
    ImageFormat::Jpg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Svg,
];
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const HERO: CategoryDescriptor = CategoryDescriptor {
    category: PhotoCategory::Hero,
    name: "Hero Banner",
    description: "Full-width background carousel on the home page",
    max_count: 5,
    recommended_width: 1920,
    recommended_height: 1080,
    supported_formats: RASTER,
    required_fields: &[],
    max_file_size: MAX_FILE_SIZE,
};

const IMAGE_SLIDER: CategoryDescriptor = CategoryDescriptor {
    category: PhotoCategory::ImageSlider,
    name: "Image Slider",
    description: "Captioned image slider section on the home page",
    max_count: 10,
    recommended_width: 1920,
    recommended_height: 1080,
    supported_formats: RASTER,
    required_fields: &[PhotoTextField::TextField1, PhotoTextField::TextField2],
    max_file_size: MAX_FILE_SIZE,
};

const NEWS_CAROUSEL: CategoryDescriptor = CategoryDescriptor {
    category: PhotoCategory::NewsCarousel,
    name: "News Carousel",
    description: "News ticker carousel on the home page",
    max_count: 15,
    recommended_width: 800,
    recommended_height: 800,
    supported_formats: RASTER,
    required_fields: &[],
    max_file_size: MAX_FILE_SIZE,
};

const BRAND_LOGO: CategoryDescriptor = CategoryDescriptor {
    category: PhotoCategory::BrandLogo,
    name: "Brand Logo",
    description: "Brand collection showcase",
    max_count: 20,
    recommended_width: 400,
    recommended_height: 400,
    supported_formats: RASTER_AND_SVG,
    required_fields: &[],
    max_file_size: MAX_FILE_SIZE,
};

const STORE_PHOTO: CategoryDescriptor = CategoryDescriptor {
    category: PhotoCategory::StorePhoto,
    name: "Store Photo",
    description: "Branch store showcase",
    max_count: 10,
    recommended_width: 1200,
    recommended_height: 800,
    supported_formats: RASTER,
    required_fields: &[],
    max_file_size: MAX_FILE_SIZE,
};

const PRODUCT_PHOTO: CategoryDescriptor = CategoryDescriptor {
    category: PhotoCategory::ProductPhoto,
    name: "Product Photo",
    description: "Catalog images referenced by products",
    max_count: 100,
    recommended_width: 1200,
    recommended_height: 1200,
    supported_formats: RASTER,
    required_fields: &[],
    max_file_size: MAX_FILE_SIZE,
};

static DESCRIPTORS: [CategoryDescriptor; 6] = [
    HERO,
    IMAGE_SLIDER,
    NEWS_CAROUSEL,
    BRAND_LOGO,
    STORE_PHOTO,
    PRODUCT_PHOTO,
];

/// Lookup table over [`CategoryDescriptor`]s
pub struct CategoryRegistry;

impl CategoryRegistry {
    pub fn all() -> &'static [CategoryDescriptor] {
        &DESCRIPTORS
    }

    pub fn describe(category: PhotoCategory) -> &'static CategoryDescriptor {
        match category {
            PhotoCategory::Hero => &HERO,
            PhotoCategory::ImageSlider => &IMAGE_SLIDER,
            PhotoCategory::NewsCarousel => &NEWS_CAROUSEL,
            PhotoCategory::BrandLogo => &BRAND_LOGO,
            PhotoCategory::StorePhoto => &STORE_PHOTO,
            PhotoCategory::ProductPhoto => &PRODUCT_PHOTO,
        }
    }

    pub fn required_fields(category: PhotoCategory) -> &'static [PhotoTextField] {
        Self::describe(category).required_fields
    }

    pub fn is_valid(tag: &str) -> bool {
        Self::parse(tag).is_some()
    }

    pub fn parse(tag: &str) -> Option<PhotoCategory> {
        tag.parse().ok()
    }

    /// Fail when a field the category requires is missing or blank
    pub fn check_required_fields(metadata: &PhotoMetadata) -> Result<()> {
        let missing: Vec<&str> = Self::required_fields(metadata.category)
            .iter()
            .filter(|field| {
                metadata
                    .text_field(**field)
                    .map(|value| value.trim().is_empty())
                    .unwrap_or(true)
            })
            .map(|field| field.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Category '{}' requires: {}",
                metadata.category,
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_matching_descriptor() {
        for category in PhotoCategory::ALL {
            assert_eq!(CategoryRegistry::describe(category).category, category);
        }
        assert_eq!(CategoryRegistry::all().len(), PhotoCategory::ALL.len());
    }

    #[test]
    fn test_all_and_describe_agree() {
        for descriptor in CategoryRegistry::all() {
            let described = CategoryRegistry::describe(descriptor.category);
            assert_eq!(described.name, descriptor.name);
            assert_eq!(described.max_count, descriptor.max_count);
            assert_eq!(described.required_fields, descriptor.required_fields);
        }
        assert_eq!(
            CategoryRegistry::describe(PhotoCategory::ProductPhoto).name,
            "Product Photo"
        );
        assert_eq!(
            CategoryRegistry::describe(PhotoCategory::BrandLogo).max_count,
            20
        );
    }

    #[test]
    fn test_only_image_slider_requires_text_fields() {
        assert_eq!(
            CategoryRegistry::required_fields(PhotoCategory::ImageSlider),
            &[PhotoTextField::TextField1, PhotoTextField::TextField2]
        );
        for category in PhotoCategory::ALL {
            if category != PhotoCategory::ImageSlider {
                assert!(CategoryRegistry::required_fields(category).is_empty());
            }
        }
    }

    #[test]
    fn test_is_valid() {
        assert!(CategoryRegistry::is_valid("brand_logo"));
        assert!(CategoryRegistry::is_valid("product_photo"));
        assert!(!CategoryRegistry::is_valid("Brand_Logo"));
        assert!(!CategoryRegistry::is_valid(""));
    }

    #[test]
    fn test_svg_only_for_brand_logo() {
        for category in PhotoCategory::ALL {
            let accepts_svg = CategoryRegistry::describe(category).accepts(ImageFormat::Svg);
            assert_eq!(accepts_svg, category == PhotoCategory::BrandLogo);
        }
    }

    #[test]
    fn test_format_from_content_type() {
        assert_eq!(
            ImageFormat::from_content_type("image/jpg"),
            Some(ImageFormat::Jpg)
        );
        assert_eq!(
            ImageFormat::from_content_type("IMAGE/PNG; charset=binary"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_content_type("application/pdf"), None);
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        let mut metadata = PhotoMetadata::new(PhotoCategory::ImageSlider);
        metadata.text_field_1 = Some("   ".to_string());
        metadata.text_field_2 = Some("Spring sale".to_string());

        let err = CategoryRegistry::check_required_fields(&metadata).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("text_field_1")));

        metadata.text_field_1 = Some("New frames".to_string());
        assert!(CategoryRegistry::check_required_fields(&metadata).is_ok());
    }

    #[test]
    fn test_recommended_size_format() {
        assert_eq!(
            CategoryRegistry::describe(PhotoCategory::StorePhoto).recommended_size(),
            "1200x800"
        );
    }
}
