use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::{Photo, PhotoCategory, PhotoFilter, PhotoSortField};
use crate::features::photos::repositories::PhotoRepository;
use crate::features::photos::services::category_registry::CategoryRegistry;
use crate::shared::types::{Page, PaginationQuery, SortOrder};

/// Listing request for [`PhotoQueryService::list`]
#[derive(Debug, Clone, Default)]
pub struct PhotoListQuery {
    pub category: Option<PhotoCategory>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: PhotoSortField,
    pub sort_order: SortOrder,
    pub pagination: PaginationQuery,
}

/// Active row count of a category against its soft cap
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: PhotoCategory,
    pub name: &'static str,
    pub count: i64,
    pub max_count: i64,
    pub remaining: i64,
    pub over_capacity: bool,
}

/// Read side of the photo collection
pub struct PhotoQueryService {
    repository: Arc<dyn PhotoRepository>,
}

impl PhotoQueryService {
    pub fn new(repository: Arc<dyn PhotoRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &PhotoListQuery) -> Result<Page<Photo>> {
        let filter = PhotoFilter {
            category: query.category,
            search: query.search.clone(),
            is_active: query.is_active,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
            offset: query.pagination.offset(),
            limit: query.pagination.limit(),
        };

        let (items, total) = self.repository.list(&filter).await?;
        Ok(Page::new(items, total, &query.pagination))
    }

    pub async fn get(&self, id: Uuid) -> Result<Photo> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo {} not found", id)))
    }

    pub async fn list_active_by_category(&self, category: PhotoCategory) -> Result<Vec<Photo>> {
        self.repository.list_active_by_category(category).await
    }

    /// One entry per registered category, in registry order
    pub async fn category_stats(&self) -> Result<Vec<CategoryStats>> {
        let counts: HashMap<PhotoCategory, i64> = self
            .repository
            .count_active_by_category()
            .await?
            .into_iter()
            .collect();

        Ok(CategoryRegistry::all()
            .iter()
            .map(|descriptor| {
                let count = counts.get(&descriptor.category).copied().unwrap_or(0);
                CategoryStats {
                    category: descriptor.category,
                    name: descriptor.name,
                    count,
                    max_count: descriptor.max_count,
                    remaining: (descriptor.max_count - count).max(0),
                    over_capacity: count > descriptor.max_count,
                }
            })
            .collect())
    }
}
