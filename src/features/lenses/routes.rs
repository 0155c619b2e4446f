use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::lenses::handlers;
use crate::features::lenses::services::LensService;

/// Create routes for the lenses feature
pub fn routes(service: Arc<LensService>) -> Router {
    Router::new()
        .route(
            "/api/lenses",
            get(handlers::list_lenses).post(handlers::create_lens),
        )
        .route(
            "/api/lenses/{id}",
            get(handlers::get_lens)
                .put(handlers::update_lens)
                .delete(handlers::delete_lens),
        )
        .with_state(service)
}
