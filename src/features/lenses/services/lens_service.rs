use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::lenses::dtos::{clean_features, CreateLensDto, LensListQuery, UpdateLensDto};
use crate::features::lenses::models::Lens;
use crate::shared::types::{like_pattern, Page};
use crate::shared::validation::non_blank;

const LENS_COLUMNS: &str = "id, name, brand, category, image_url, short_description, \
     description, price, in_stock, features, created_at, updated_at";

/// Service for lens catalog operations
pub struct LensService {
    pool: PgPool,
}

impl LensService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &LensListQuery) {
        builder.push(" WHERE 1=1");

        if let Some(search) = non_blank(query.search.clone()) {
            let pattern = like_pattern(&search);
            builder.push(" AND (name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR brand ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR short_description ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }

        if let Some(brand) = non_blank(query.brand.clone()) {
            builder.push(" AND LOWER(brand) = LOWER(");
            builder.push_bind(brand);
            builder.push(")");
        }

        if let Some(category) = non_blank(query.category.clone()) {
            builder.push(" AND LOWER(category) = LOWER(");
            builder.push_bind(category);
            builder.push(")");
        }

        if let Some(in_stock) = query.in_stock {
            builder.push(" AND in_stock = ");
            builder.push_bind(in_stock);
        }
    }

    /// List lenses with search, brand/category filters, sorting and pagination
    pub async fn list(&self, query: &LensListQuery) -> Result<Page<Lens>> {
        let pagination = query.pagination();
        let (sort_by, sort_order) = query.sort();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM lenses");
        Self::push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to count lenses", e))?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM lenses", LENS_COLUMNS));
        Self::push_filters(&mut select, query);
        select.push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            sort_by.column(),
            sort_order.as_sql()
        ));
        select.push_bind(pagination.limit());
        select.push(" OFFSET ");
        select.push_bind(pagination.offset());

        let lenses = select
            .build_query_as::<Lens>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to list lenses", e))?;

        Ok(Page::new(lenses, total, &pagination))
    }

    /// Get lens by id
    pub async fn get(&self, id: Uuid) -> Result<Lens> {
        let sql = format!("SELECT {} FROM lenses WHERE id = $1", LENS_COLUMNS);

        sqlx::query_as::<_, Lens>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to get lens", e))?
            .ok_or_else(|| AppError::NotFound(format!("Lens {} not found", id)))
    }

    /// Create a lens
    pub async fn create(&self, dto: CreateLensDto) -> Result<Lens> {
        let sql = format!(
            "INSERT INTO lenses \
             (name, brand, category, image_url, short_description, description, price, in_stock, features) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            LENS_COLUMNS
        );

        let lens = sqlx::query_as::<_, Lens>(&sql)
            .bind(dto.name.trim())
            .bind(dto.brand.trim())
            .bind(non_blank(dto.category))
            .bind(non_blank(dto.image_url))
            .bind(non_blank(dto.short_description))
            .bind(non_blank(dto.description))
            .bind(dto.price)
            .bind(dto.in_stock.unwrap_or(true))
            .bind(clean_features(dto.features.unwrap_or_default()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to create lens", e))?;

        info!("Created lens {} ({})", lens.id, lens.name);
        Ok(lens)
    }

    /// Patch a lens
    pub async fn update(&self, id: Uuid, dto: UpdateLensDto) -> Result<Lens> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE lenses SET updated_at = NOW()");
        if let Some(name) = dto.name {
            builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(brand) = dto.brand {
            builder.push(", brand = ").push_bind(brand.trim().to_string());
        }
        if let Some(category) = dto.category {
            builder.push(", category = ").push_bind(non_blank(Some(category)));
        }
        if let Some(image_url) = dto.image_url {
            builder.push(", image_url = ").push_bind(non_blank(Some(image_url)));
        }
        if let Some(short_description) = dto.short_description {
            builder
                .push(", short_description = ")
                .push_bind(non_blank(Some(short_description)));
        }
        if let Some(description) = dto.description {
            builder
                .push(", description = ")
                .push_bind(non_blank(Some(description)));
        }
        if let Some(price) = dto.price {
            builder.push(", price = ").push_bind(price);
        }
        if let Some(in_stock) = dto.in_stock {
            builder.push(", in_stock = ").push_bind(in_stock);
        }
        if let Some(features) = dto.features {
            builder.push(", features = ").push_bind(clean_features(features));
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {}", LENS_COLUMNS));

        builder
            .build_query_as::<Lens>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to update lens", e))?
            .ok_or_else(|| AppError::NotFound(format!("Lens {} not found", id)))
    }

    /// Delete a lens
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM lenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to delete lens", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Lens {} not found", id)));
        }

        info!("Deleted lens {}", id);
        Ok(())
    }
}
