use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{CreateProductDto, ProductListQuery, UpdateProductDto};
use crate::features::products::models::Product;
use crate::shared::types::{like_pattern, Page};
use crate::shared::validation::non_blank;

const PRODUCT_COLUMNS: &str =
    "id, name, brand, image_url, photo_id, description, in_stock, created_at, updated_at";

/// Service for product catalog operations
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductListQuery) {
        builder.push(" WHERE 1=1");

        if let Some(search) = non_blank(query.search.clone()) {
            let pattern = like_pattern(&search);
            builder.push(" AND (name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR brand ILIKE ");
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

        if let Some(in_stock) = query.in_stock {
            builder.push(" AND in_stock = ");
            builder.push_bind(in_stock);
        }
    }

    /// List products with search, brand filter, sorting and pagination
    pub async fn list(&self, query: &ProductListQuery) -> Result<Page<Product>> {
        let pagination = query.pagination();
        let (sort_by, sort_order) = query.sort();

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        Self::push_filters(&mut count, query);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to count products", e))?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM products", PRODUCT_COLUMNS));
        Self::push_filters(&mut select, query);
        select.push(format!(
            " ORDER BY {} {}, id ASC LIMIT ",
            sort_by.column(),
            sort_order.as_sql()
        ));
        select.push_bind(pagination.limit());
        select.push(" OFFSET ");
        select.push_bind(pagination.offset());

        let products = select
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to list products", e))?;

        Ok(Page::new(products, total, &pagination))
    }

    /// Get product by id
    pub async fn get(&self, id: Uuid) -> Result<Product> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to get product", e))?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// Image URL of a referenced photo; fails when the photo does not exist
    async fn photo_image_url(&self, photo_id: Uuid) -> Result<String> {
        sqlx::query_scalar::<_, String>("SELECT image_url FROM photos WHERE id = $1")
            .bind(photo_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::query("Failed to look up product photo", e))?
            .ok_or_else(|| {
                AppError::Validation(format!("photo_id {} does not reference a photo", photo_id))
            })
    }

    /// Create a product. Without an explicit `image_url` the referenced photo's URL is used.
    pub async fn create(&self, dto: CreateProductDto) -> Result<Product> {
        let mut image_url = non_blank(dto.image_url);
        if let Some(photo_id) = dto.photo_id {
            let photo_url = self.photo_image_url(photo_id).await?;
            image_url.get_or_insert(photo_url);
        }

        let sql = format!(
            "INSERT INTO products (name, brand, image_url, photo_id, description, in_stock) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PRODUCT_COLUMNS
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(dto.name.trim())
            .bind(dto.brand.trim())
            .bind(image_url)
            .bind(dto.photo_id)
            .bind(non_blank(dto.description))
            .bind(dto.in_stock.unwrap_or(true))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to create product", e))?;

        info!("Created product {} ({})", product.id, product.name);
        Ok(product)
    }

    /// Patch a product
    pub async fn update(&self, id: Uuid, dto: UpdateProductDto) -> Result<Product> {
        let mut image_url = dto.image_url.map(|url| non_blank(Some(url)));
        if let Some(photo_id) = dto.photo_id {
            let photo_url = self.photo_image_url(photo_id).await?;
            // A newly picked photo supplies the image unless a URL came with it
            if image_url.is_none() {
                image_url = Some(Some(photo_url));
            }
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE products SET updated_at = NOW()");
        if let Some(name) = dto.name {
            builder.push(", name = ").push_bind(name.trim().to_string());
        }
        if let Some(brand) = dto.brand {
            builder.push(", brand = ").push_bind(brand.trim().to_string());
        }
        if let Some(url) = image_url {
            builder.push(", image_url = ").push_bind(url);
        }
        if let Some(photo_id) = dto.photo_id {
            builder.push(", photo_id = ").push_bind(photo_id);
        }
        if let Some(description) = dto.description {
            builder
                .push(", description = ")
                .push_bind(non_blank(Some(description)));
        }
        if let Some(in_stock) = dto.in_stock {
            builder.push(", in_stock = ").push_bind(in_stock);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(format!(" RETURNING {}", PRODUCT_COLUMNS));

        builder
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to update product", e))?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    /// Delete a product
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::persistence("Failed to delete product", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        info!("Deleted product {}", id);
        Ok(())
    }
}
