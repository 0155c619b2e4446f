use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::photos::models::{NewPhoto, Photo, PhotoCategory, PhotoChanges, PhotoFilter};

/// Persistence port for photo rows
///
/// Reads fail with `AppError::Query`, writes with `AppError::Persistence`.
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>>;

    /// One page of rows matching `filter` plus the total match count
    async fn list(&self, filter: &PhotoFilter) -> Result<(Vec<Photo>, i64)>;

    /// Active rows of one category ordered by `display_order`
    async fn list_active_by_category(&self, category: PhotoCategory) -> Result<Vec<Photo>>;

    async fn list_all(&self) -> Result<Vec<Photo>>;

    /// `None` when no row has `id`
    async fn update(&self, id: Uuid, changes: PhotoChanges) -> Result<Option<Photo>>;

    /// Apply every `(id, display_order)` pair atomically.
    /// Fails with `AppError::NotFound` (and changes nothing) if any id is unknown.
    async fn update_display_orders(&self, orders: &[(Uuid, i32)]) -> Result<()>;

    /// `false` when no row had `id`
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Active row count per category. Categories without rows may be absent.
    async fn count_active_by_category(&self) -> Result<Vec<(PhotoCategory, i64)>>;
}
