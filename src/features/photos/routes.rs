use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::core::middleware::no_cache_headers;
use crate::features::photos::handlers;
use crate::features::photos::services::{
    PhotoMaintenanceService, PhotoQueryService, PhotoTransactionService,
};

/// Shared state for every photo route
#[derive(Clone)]
pub struct PhotoState {
    pub transactions: Arc<PhotoTransactionService>,
    pub queries: Arc<PhotoQueryService>,
    pub maintenance: Arc<PhotoMaintenanceService>,
}

/// Create routes for the photos feature
pub fn routes(state: PhotoState, max_file_size: usize) -> Router {
    // Multipart framing and text fields need room beyond the file itself
    let upload_limit = max_file_size + 1024 * 1024;

    let reads = Router::new()
        .route("/api/photos", get(handlers::list_photos))
        .route(
            "/api/photos/category/{category}",
            get(handlers::list_photos_by_category),
        )
        .route("/api/photos/{id}", get(handlers::get_photo))
        .route("/api/photo-categories", get(handlers::list_categories))
        .route("/api/photo-categories/stats", get(handlers::category_stats))
        .route_layer(middleware::from_fn(no_cache_headers));

    let writes = Router::new()
        .route(
            "/api/photos",
            post(handlers::create_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/photos/{id}",
            put(handlers::update_photo).delete(handlers::delete_photo),
        )
        .route(
            "/api/photos/{id}/image",
            put(handlers::replace_photo_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/photos/bulk-delete", post(handlers::bulk_delete_photos))
        .route("/api/photos/order", put(handlers::reorder_photos));

    let maintenance = Router::new()
        .route("/api/maintenance/orphans", get(handlers::orphan_report))
        .route(
            "/api/maintenance/orphans/sweep",
            post(handlers::sweep_orphans),
        )
        .route("/api/maintenance/repair-urls", post(handlers::repair_urls));

    reads.merge(writes).merge(maintenance).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::photos::models::PhotoCategory;
    use crate::shared::test_helpers::{
        FixedUrlProbe, InMemoryObjectStore, InMemoryPhotoRepository,
    };

    const LIMIT: usize = 10 * 1024 * 1024;

    struct Harness {
        server: TestServer,
        store: Arc<InMemoryObjectStore>,
        repository: Arc<InMemoryPhotoRepository>,
    }

    fn harness() -> Harness {
        let store = Arc::new(InMemoryObjectStore::new());
        let repository = Arc::new(InMemoryPhotoRepository::new());
        let state = PhotoState {
            transactions: Arc::new(PhotoTransactionService::new(
                store.clone(),
                repository.clone(),
                LIMIT,
            )),
            queries: Arc::new(PhotoQueryService::new(repository.clone())),
            maintenance: Arc::new(PhotoMaintenanceService::new(
                store.clone(),
                repository.clone(),
                Arc::new(FixedUrlProbe(true)),
            )),
        };
        let server = TestServer::new(routes(state, LIMIT)).unwrap();
        Harness {
            server,
            store,
            repository,
        }
    }

    fn png_part(size: usize) -> Part {
        Part::bytes(vec![1u8; size])
            .file_name("photo.png")
            .mime_type("image/png")
    }

    #[tokio::test]
    async fn test_create_photo_via_multipart() {
        let h = harness();
        let form = MultipartForm::new()
            .add_text("category", "brand_logo")
            .add_text("title", "Rayban")
            .add_part("file", png_part(64));

        let response = h.server.post("/api/photos").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["category"], "brand_logo");
        assert_eq!(body["data"]["display_order"], 0);
        assert_eq!(body["data"]["is_active"], true);
        assert_eq!(h.repository.count(), 1);
        assert_eq!(h.store.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_create_photo_unknown_category() {
        let h = harness();
        let form = MultipartForm::new()
            .add_text("category", "banner")
            .add_part("file", png_part(64));

        let response = h.server.post("/api/photos").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(h.store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_create_slider_without_text_field_is_rejected() {
        let h = harness();
        let form = MultipartForm::new()
            .add_text("category", "image_slider")
            .add_text("text_field_2", "Caption")
            .add_part("file", png_part(64));

        let response = h.server.post("/api/photos").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("text_field_1"));
        assert_eq!(h.store.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_create_reports_storage_failure_as_bad_gateway() {
        let h = harness();
        h.store.fail_uploads(true);
        let form = MultipartForm::new()
            .add_text("category", "hero")
            .add_part("file", png_part(64));

        let response = h.server.post("/api/photos").multipart(form).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(h.repository.count(), 0);
    }

    #[tokio::test]
    async fn test_list_photos_paginates() {
        let h = harness();
        for order in 1..=25 {
            h.repository
                .seed(PhotoCategory::Hero, "https://cdn.test/x.jpg", order);
        }

        let response = h
            .server
            .get("/api/photos")
            .add_query_param("page", 2)
            .add_query_param("per_page", 10)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("cache-control"),
            "no-cache, no-store, must-revalidate"
        );
        let body: Value = response.json();
        assert_eq!(body["data"]["total"], 25);
        assert_eq!(body["data"]["total_pages"], 3);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 10);
        assert_eq!(body["data"]["items"][0]["display_order"], 11);
    }

    #[tokio::test]
    async fn test_list_photos_with_huge_page_is_empty() {
        let h = harness();
        h.repository
            .seed(PhotoCategory::Hero, "https://cdn.test/x.jpg", 1);

        let response = h
            .server
            .get("/api/photos")
            .add_query_param("page", i64::MAX)
            .add_query_param("per_page", 10)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"], json!([]));
    }

    #[tokio::test]
    async fn test_search_photos_by_text() {
        let h = harness();
        for (category, field, value) in [
            ("hero", "title", "Summer Collection"),
            ("news_carousel", "subtitle", "Winter clearance"),
            ("brand_logo", "title", "Oakley"),
        ] {
            let form = MultipartForm::new()
                .add_text("category", category)
                .add_text(field, value)
                .add_part("file", png_part(64));
            h.server
                .post("/api/photos")
                .multipart(form)
                .await
                .assert_status(StatusCode::CREATED);
        }
        let form = MultipartForm::new()
            .add_text("category", "image_slider")
            .add_text("text_field_1", "SUMMER sale")
            .add_text("text_field_2", "Up to 50% off")
            .add_part("file", png_part(64));
        h.server
            .post("/api/photos")
            .multipart(form)
            .await
            .assert_status(StatusCode::CREATED);

        let response = h
            .server
            .get("/api/photos")
            .add_query_param("search", "sUmMeR")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["total"], 2);
        let mut categories: Vec<&str> = body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["category"].as_str().unwrap())
            .collect();
        categories.sort_unstable();
        assert_eq!(categories, vec!["hero", "image_slider"]);

        let response = h
            .server
            .get("/api/photos")
            .add_query_param("search", "50%")
            .await;
        let body: Value = response.json();
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"][0]["text_field_2"], "Up to 50% off");
    }

    #[tokio::test]
    async fn test_get_missing_photo_is_not_found() {
        let h = harness();
        let response = h
            .server
            .get(&format!("/api/photos/{}", uuid::Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_delete_photo() {
        let h = harness();
        let photo = h
            .repository
            .seed(PhotoCategory::StorePhoto, "https://cdn.test/s.jpg", 1);

        let response = h
            .server
            .put(&format!("/api/photos/{}", photo.id))
            .json(&json!({ "title": "Main branch", "display_order": 4 }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["title"], "Main branch");
        assert_eq!(body["data"]["display_order"], 4);

        let response = h
            .server
            .delete(&format!("/api/photos/{}", photo.id))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["deleted"], true);
        assert_eq!(body["data"]["object_removed"], false);
        assert_eq!(h.repository.count(), 0);
    }

    #[tokio::test]
    async fn test_reorder_route_is_not_shadowed_by_id_route() {
        let h = harness();
        let a = h.repository.seed(PhotoCategory::Hero, "https://cdn.test/a.jpg", 1);
        let b = h.repository.seed(PhotoCategory::Hero, "https://cdn.test/b.jpg", 2);

        let response = h
            .server
            .put("/api/photos/order")
            .json(&json!({ "items": [
                { "id": a.id, "display_order": 2 },
                { "id": b.id, "display_order": 1 }
            ]}))
            .await;

        response.assert_status_ok();
        assert_eq!(h.repository.get(a.id).unwrap().display_order, 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_reports_per_id() {
        let h = harness();
        let photo = h.repository.seed(PhotoCategory::Hero, "https://cdn.test/a.jpg", 1);

        let response = h
            .server
            .post("/api/photos/bulk-delete")
            .json(&json!({ "ids": [photo.id, uuid::Uuid::new_v4()] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["deleted"], 1);
        assert_eq!(body["data"]["failed"], 1);
    }

    #[tokio::test]
    async fn test_category_endpoints() {
        let h = harness();
        h.repository
            .seed(PhotoCategory::BrandLogo, "https://cdn.test/logo.png", 1);

        let response = h.server.get("/api/photo-categories").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let categories = body["data"].as_array().unwrap();
        assert_eq!(categories.len(), 6);
        let slider = categories
            .iter()
            .find(|c| c["category"] == "image_slider")
            .unwrap();
        assert_eq!(slider["required_fields"], json!(["text_field_1", "text_field_2"]));
        assert_eq!(slider["max_file_size"], LIMIT);

        let response = h.server.get("/api/photo-categories/stats").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let logos = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["category"] == "brand_logo")
            .unwrap()
            .clone();
        assert_eq!(logos["count"], 1);
        assert_eq!(logos["remaining"], 19);

        let response = h.server.get("/api/photos/category/not_a_category").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_orphan_sweep_defaults_to_dry_run() {
        let h = harness();
        h.store
            .put_object("photos/hero/1-old.jpg", Some("2024-01-01T00:00:00Z"));

        let response = h
            .server
            .post("/api/maintenance/orphans/sweep")
            .json(&json!({}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["dry_run"], true);
        assert_eq!(body["data"]["keys"], json!(["photos/hero/1-old.jpg"]));
        assert!(h.store.contains("photos/hero/1-old.jpg"));
    }
}
