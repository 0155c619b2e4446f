use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::photos::models::{NewPhoto, Photo, PhotoCategory, PhotoChanges, PhotoFilter};
use crate::features::photos::repositories::PhotoRepository;
use crate::shared::types::like_pattern;

const PHOTO_COLUMNS: &str = "id, image_url, category, title, subtitle, text_field_1, \
     text_field_2, display_order, is_active, created_at, updated_at";

/// Postgres-backed [`PhotoRepository`]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PhotoFilter) {
        builder.push(" WHERE 1=1");

        if let Some(category) = filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }

        if let Some(is_active) = filter.is_active {
            builder.push(" AND is_active = ");
            builder.push_bind(is_active);
        }

        if let Some(search) = filter.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                let pattern = like_pattern(search);
                builder.push(" AND (");
                for (i, column) in ["title", "subtitle", "text_field_1", "text_field_2"]
                    .iter()
                    .enumerate()
                {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder.push(*column);
                    builder.push(" ILIKE ");
                    builder.push_bind(pattern.clone());
                }
                builder.push(")");
            }
        }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo> {
        let sql = format!(
            "INSERT INTO photos (image_url, category, title, subtitle, text_field_1, \
             text_field_2, display_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            PHOTO_COLUMNS
        );

        let row = sqlx::query_as::<_, Photo>(&sql)
            .bind(&photo.image_url)
            .bind(photo.category)
            .bind(&photo.title)
            .bind(&photo.subtitle)
            .bind(&photo.text_field_1)
            .bind(&photo.text_field_2)
            .bind(photo.display_order)
            .bind(photo.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to insert photo", e))?;

        debug!("Inserted photo {} in category {}", row.id, row.category);
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>> {
        let sql = format!("SELECT {} FROM photos WHERE id = $1", PHOTO_COLUMNS);

        sqlx::query_as::<_, Photo>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to fetch photo", e))
    }

    async fn list(&self, filter: &PhotoFilter) -> Result<(Vec<Photo>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM photos");
        Self::push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to count photos", e))?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM photos", PHOTO_COLUMNS));
        Self::push_filters(&mut select, filter);
        // Column and direction come from whitelisted enums, never from user text
        select.push(format!(
            " ORDER BY {} {}, created_at ASC, id ASC",
            filter.sort_by.column(),
            filter.sort_order.as_sql()
        ));
        select.push(" LIMIT ");
        select.push_bind(filter.limit);
        select.push(" OFFSET ");
        select.push_bind(filter.offset);

        let rows = select
            .build_query_as::<Photo>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to list photos", e))?;

        Ok((rows, total))
    }

    async fn list_active_by_category(&self, category: PhotoCategory) -> Result<Vec<Photo>> {
        let sql = format!(
            "SELECT {} FROM photos WHERE category = $1 AND is_active = TRUE \
             ORDER BY display_order ASC, created_at ASC, id ASC",
            PHOTO_COLUMNS
        );

        sqlx::query_as::<_, Photo>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to list photos by category", e))
    }

    async fn list_all(&self) -> Result<Vec<Photo>> {
        let sql = format!(
            "SELECT {} FROM photos ORDER BY category, display_order, created_at",
            PHOTO_COLUMNS
        );

        sqlx::query_as::<_, Photo>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to list photos", e))
    }

    async fn update(&self, id: Uuid, changes: PhotoChanges) -> Result<Option<Photo>> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE photos SET updated_at = NOW()");

        if let Some(url) = changes.image_url {
            builder.push(", image_url = ").push_bind(url);
        }
        if let Some(category) = changes.category {
            builder.push(", category = ").push_bind(category);
        }
        if let Some(title) = changes.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(subtitle) = changes.subtitle {
            builder.push(", subtitle = ").push_bind(subtitle);
        }
        if let Some(text) = changes.text_field_1 {
            builder.push(", text_field_1 = ").push_bind(text);
        }
        if let Some(text) = changes.text_field_2 {
            builder.push(", text_field_2 = ").push_bind(text);
        }
        if let Some(order) = changes.display_order {
            builder.push(", display_order = ").push_bind(order);
        }
        if let Some(active) = changes.is_active {
            builder.push(", is_active = ").push_bind(active);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {}", PHOTO_COLUMNS));

        builder
            .build_query_as::<Photo>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to update photo", e))
    }

    async fn update_display_orders(&self, orders: &[(Uuid, i32)]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::persistence("Failed to start transaction", e))?;

        for (id, order) in orders {
            let result = sqlx::query(
                "UPDATE photos SET display_order = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(order)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::persistence("Failed to reorder photos", e))?;

            if result.rows_affected() != 1 {
                // Dropping `tx` rolls back every update made so far
                return Err(AppError::NotFound(format!("Photo {} not found", id)));
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::persistence("Failed to commit reorder", e))?;

        debug!("Reordered {} photos", orders.len());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to delete photo", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active_by_category(&self) -> Result<Vec<(PhotoCategory, i64)>> {
        sqlx::query_as::<_, (PhotoCategory, i64)>(
            "SELECT category, COUNT(*) FROM photos WHERE is_active = TRUE GROUP BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::query("Failed to count photos by category", e))
    }
}
