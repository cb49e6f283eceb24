//! Product repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Product, ProductInput};

/// Product repository
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first
    pub async fn list(&self) -> DatabaseResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, image_url, created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::product_from_row).collect())
    }

    /// Get a product by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, image_url, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::product_from_row))
    }

    /// Create a new product
    pub async fn create(&self, input: &ProductInput) -> DatabaseResult<Product> {
        info!("Creating product: {}", input.name);

        let row = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, image_url, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::product_from_row(&row))
    }

    /// Update a product, returning None when the id is unknown
    ///
    /// Full-field replace; concurrent updates race at the store's normal
    /// last-write-wins semantics.
    pub async fn update(&self, id: Uuid, input: &ProductInput) -> DatabaseResult<Option<Product>> {
        info!("Updating product: {}", id);

        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, image_url = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, name, description, price, image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::product_from_row))
    }

    /// Delete a product, returning whether a row was removed
    ///
    /// Idempotent at the store level; deleting an already-deleted id is
    /// simply false, never an error.
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn product_from_row(row: &sqlx::postgres::PgRow) -> Product {
        Product {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            price: row.get("price"),
            image_url: row.get("image_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}
