//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Registration (validated, prices in cents)
//! - Alphabetical listing for the product page and the inventory report
//! - Restricted deletion (products on recorded sales stay)
//!
//! Stock is only ever changed by the sale registration transaction in
//! [`SaleRepository`](super::sale::SaleRepository).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use inventix_core::validation::validate_new_product;
use inventix_core::{CoreError, NewProduct, Product};

use super::PRODUCT_COLUMNS;
use crate::error::DbResult;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list().await?;
/// let one = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Registers a product.
    ///
    /// Blank description or supplier are stored as NULL.
    pub async fn insert(&self, input: &NewProduct) -> DbResult<Product> {
        let product = validate_new_product(input.clone()).map_err(CoreError::from)?;

        debug!(name = %product.name, price = %product.price, "Inserting product");

        let sql = format!(
            "INSERT INTO products (name, description, price_cents, stock, supplier, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let stored: Product = sqlx::query_as(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price.cents())
            .bind(product.stock)
            .bind(&product.supplier)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        info!(id = stored.id, name = %stored.name, "Product registered");
        Ok(stored)
    }

    /// Lists all products, sorted by name (ties by id).
    ///
    /// This is also the row order of the inventory report.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id");

        let products: Vec<Product> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Ok(n)` - Rows removed; `0` when no such product exists
    /// * `Err(DbError::ForeignKeyViolation)` - The product appears on a sale
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        info!(id, removed, "Product delete finished");
        Ok(removed)
    }

    /// Counts registered products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
