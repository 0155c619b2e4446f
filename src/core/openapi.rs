use utoipa::{Modify, OpenApi};

use crate::features::lenses::{
    dtos as lenses_dtos, handlers as lenses_handlers, models as lenses_models,
};
use crate::features::photos::{
    dtos as photos_dtos, handlers as photos_handlers, models as photos_models,
    services as photos_services,
};
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::shared::types::{ApiResponse, Meta, Page, SortOrder};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Photos
        photos_handlers::list_photos,
        photos_handlers::create_photo,
        photos_handlers::list_photos_by_category,
        photos_handlers::get_photo,
        photos_handlers::update_photo,
        photos_handlers::replace_photo_image,
        photos_handlers::delete_photo,
        photos_handlers::bulk_delete_photos,
        photos_handlers::reorder_photos,
        // Photo categories
        photos_handlers::list_categories,
        photos_handlers::category_stats,
        // Maintenance
        photos_handlers::orphan_report,
        photos_handlers::sweep_orphans,
        photos_handlers::repair_urls,
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Lenses
        lenses_handlers::list_lenses,
        lenses_handlers::get_lens,
        lenses_handlers::create_lens,
        lenses_handlers::update_lens,
        lenses_handlers::delete_lens,
    ),
    components(
        schemas(
            // Shared
            Meta,
            SortOrder,
            // Photos
            photos_models::PhotoCategory,
            photos_models::PhotoTextField,
            photos_models::PhotoSortField,
            photos_services::ImageFormat,
            photos_dtos::PhotoResponseDto,
            photos_dtos::CreatePhotoForm,
            photos_dtos::ReplaceImageForm,
            photos_dtos::UpdatePhotoDto,
            photos_dtos::ReplaceImageResponseDto,
            photos_dtos::DeletePhotoResponseDto,
            photos_dtos::BulkDeletePhotosDto,
            photos_dtos::BulkDeleteItemDto,
            photos_dtos::BulkDeleteResponseDto,
            photos_dtos::ReorderItemDto,
            photos_dtos::ReorderPhotosDto,
            ApiResponse<photos_dtos::PhotoResponseDto>,
            ApiResponse<Vec<photos_dtos::PhotoResponseDto>>,
            ApiResponse<Page<photos_dtos::PhotoResponseDto>>,
            ApiResponse<photos_dtos::ReplaceImageResponseDto>,
            ApiResponse<photos_dtos::DeletePhotoResponseDto>,
            ApiResponse<photos_dtos::BulkDeleteResponseDto>,
            // Photo categories
            photos_dtos::CategoryDescriptorDto,
            photos_dtos::CategoryStatsDto,
            ApiResponse<Vec<photos_dtos::CategoryDescriptorDto>>,
            ApiResponse<Vec<photos_dtos::CategoryStatsDto>>,
            // Maintenance
            photos_dtos::OrphanedObjectDto,
            photos_dtos::DanglingReasonDto,
            photos_dtos::DanglingPhotoDto,
            photos_dtos::OrphanReportDto,
            photos_dtos::SweepOrphansDto,
            photos_dtos::SweepReportDto,
            photos_dtos::RepairUrlsDto,
            photos_dtos::RepairedPhotoDto,
            photos_dtos::RepairReportDto,
            ApiResponse<photos_dtos::OrphanReportDto>,
            ApiResponse<photos_dtos::SweepReportDto>,
            ApiResponse<photos_dtos::RepairReportDto>,
            // Products
            products_models::ProductSortField,
            products_dtos::ProductResponseDto,
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            ApiResponse<products_dtos::ProductResponseDto>,
            ApiResponse<Page<products_dtos::ProductResponseDto>>,
            // Lenses
            lenses_models::LensSortField,
            lenses_dtos::LensResponseDto,
            lenses_dtos::CreateLensDto,
            lenses_dtos::UpdateLensDto,
            ApiResponse<lenses_dtos::LensResponseDto>,
            ApiResponse<Page<lenses_dtos::LensResponseDto>>,
        )
    ),
    tags(
        (name = "photos", description = "Storefront photos and their images"),
        (name = "photo-categories", description = "Photo category rules and usage"),
        (name = "maintenance", description = "Bucket and database consistency tools"),
        (name = "products", description = "Frame and sunglass catalog"),
        (name = "lenses", description = "Lens catalog"),
    ),
    info(
        title = "Eyewear Admin API",
        version = "0.1.0",
        description = "API documentation for the eyewear storefront admin backend",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_feature() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/photos",
            "/api/photos/{id}/image",
            "/api/photo-categories/stats",
            "/api/maintenance/orphans/sweep",
            "/api/products/{id}",
            "/api/lenses",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_swagger_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Shop Admin".to_string(),
            version: "2.0.0".to_string(),
            description: "Internal".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Shop Admin");
        assert_eq!(doc.info.description.as_deref(), Some("Internal"));
    }
}
