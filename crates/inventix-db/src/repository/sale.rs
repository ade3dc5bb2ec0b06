//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Registration Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  register(sale, policy, sold_at)                        │
//! │                                                                         │
//! │  validate_new_sale()             ← before any SQL                       │
//! │       │                                                                 │
//! │  BEGIN                                                                  │
//! │  1. UPDATE invoice_sequence ... RETURNING last_value                   │
//! │       └── first statement: takes the write lock, so two concurrent     │
//! │           registrations can never draw the same FAC-NNNNN              │
//! │  2. client exists?                 no ──► ClientNotFound               │
//! │  3. load catalog prices            missing ──► ProductNotFound         │
//! │  4. price_lines() + total()        (pure, inventix-core)               │
//! │  5. INSERT sales                                                       │
//! │  6. per line: INSERT sale_items, check StockPolicy, UPDATE stock       │
//! │                                    refused ──► InsufficientStock       │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any `?` before COMMIT drops the transaction: SQLite rolls back        │
//! │  every statement above, including the sequence bump.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never updated or deleted once recorded.

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use inventix_core::invoice::format_invoice_number;
use inventix_core::sale::{price_lines, total, PricedLine};
use inventix_core::validation::validate_new_sale;
use inventix_core::{
    CoreError, Money, NewSale, RecordedSale, Sale, SaleItem, SaleSummary, StockPolicy,
};

use crate::error::{DbError, DbResult};

const SALE_COLUMNS: &str =
    "id, invoice_number, client_id, total_cents, sale_date, sale_time, created_at";

const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale atomically.
    ///
    /// ## Arguments
    /// * `sale` - Client and requested lines
    /// * `policy` - What to do when a line exceeds the stock on hand
    /// * `sold_at` - Local wall-clock time stored as the sale date and time
    ///
    /// ## Returns
    /// The stored header (with its assigned invoice number) and its lines.
    /// On error nothing is stored and no invoice number is consumed.
    pub async fn register(
        &self,
        sale: &NewSale,
        policy: StockPolicy,
        sold_at: NaiveDateTime,
    ) -> DbResult<RecordedSale> {
        validate_new_sale(sale).map_err(CoreError::from)?;

        debug!(
            client_id = sale.client_id,
            lines = sale.items.len(),
            %policy,
            "Registering sale"
        );

        let mut tx = self.pool.begin().await?;

        let sequence: i64 = sqlx::query_scalar(
            "UPDATE invoice_sequence SET last_value = last_value + 1 WHERE id = 1 \
             RETURNING last_value",
        )
        .fetch_one(&mut *tx)
        .await?;
        let invoice_number = format_invoice_number(sequence);

        let client: Option<i64> = sqlx::query_scalar("SELECT id FROM clients WHERE id = ?1")
            .bind(sale.client_id)
            .fetch_optional(&mut *tx)
            .await?;
        if client.is_none() {
            return Err(CoreError::ClientNotFound(sale.client_id).into());
        }

        let catalog = load_catalog(&mut tx, sale).await?;
        let prices: HashMap<i64, Money> = catalog
            .iter()
            .map(|(id, entry)| (*id, entry.price))
            .collect();

        let lines = price_lines(&sale.items, &prices)?;
        let sale_total = total(&lines)?;

        for (item, line) in sale.items.iter().zip(&lines) {
            if let Some(declared) = item.declared_subtotal.filter(|d| *d != line.subtotal) {
                debug!(
                    product_id = line.product_id,
                    %declared,
                    computed = %line.subtotal,
                    "Ignoring caller subtotal"
                );
            }
        }
        if let Some(declared) = sale.declared_total.filter(|d| *d != sale_total) {
            debug!(%declared, computed = %sale_total, "Ignoring caller total");
        }

        let header_sql = format!(
            "INSERT INTO sales (invoice_number, client_id, total_cents, sale_date, sale_time, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             RETURNING {SALE_COLUMNS}"
        );
        let header: Sale = sqlx::query_as(&header_sql)
            .bind(&invoice_number)
            .bind(sale.client_id)
            .bind(sale_total.cents())
            .bind(sold_at.format("%Y-%m-%d").to_string())
            .bind(sold_at.format("%H:%M:%S").to_string())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            items.push(insert_item(&mut tx, header.id, line).await?);

            let name = catalog
                .get(&line.product_id)
                .map(|entry| entry.name.as_str())
                .unwrap_or_default();
            decrement_stock(&mut tx, line, name, policy).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            invoice_number = %header.invoice_number,
            total = %header.total(),
            lines = items.len(),
            "Sale registered"
        );

        Ok(RecordedSale { sale: header, items })
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let sql = format!("SELECT {SALE_ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY id");

        let items: Vec<SaleItem> = sqlx::query_as(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Lists every sale with its client name, most recent first.
    ///
    /// Feeds the sales report.
    pub async fn list_summaries(&self) -> DbResult<Vec<SaleSummary>> {
        let summaries: Vec<SaleSummary> = sqlx::query_as(
            r#"
            SELECT
                s.invoice_number,
                c.name AS client_name,
                s.total_cents,
                s.sale_date,
                s.sale_time
            FROM sales s
            INNER JOIN clients c ON c.id = s.client_id
            ORDER BY s.sale_date DESC, s.sale_time DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = summaries.len(), "Listed sale summaries");
        Ok(summaries)
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Sum of all sale totals in cents. Zero when there are no sales.
    pub async fn total_sold_cents(&self) -> DbResult<i64> {
        let sum: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_cents), 0) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(sum)
    }

    /// The invoice number the next registration will most likely receive.
    ///
    /// Display only: a concurrent registration may take it first, and the
    /// number actually assigned is the one `register` returns.
    pub async fn next_invoice_preview(&self) -> DbResult<String> {
        let next: i64 =
            sqlx::query_scalar("SELECT last_value + 1 FROM invoice_sequence WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(format_invoice_number(next))
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

struct CatalogEntry {
    name: String,
    price: Money,
}

/// Loads name and price of every product the sale references.
async fn load_catalog(
    tx: &mut Transaction<'_, Sqlite>,
    sale: &NewSale,
) -> DbResult<HashMap<i64, CatalogEntry>> {
    let mut catalog = HashMap::with_capacity(sale.items.len());

    for item in &sale.items {
        if catalog.contains_key(&item.product_id) {
            continue;
        }

        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT name, price_cents FROM products WHERE id = ?1")
                .bind(item.product_id)
                .fetch_optional(&mut **tx)
                .await?;

        let (name, price_cents) = row.ok_or(CoreError::ProductNotFound(item.product_id))?;
        catalog.insert(
            item.product_id,
            CatalogEntry {
                name,
                price: Money::from_cents(price_cents),
            },
        );
    }

    Ok(catalog)
}

async fn insert_item(
    tx: &mut Transaction<'_, Sqlite>,
    sale_id: i64,
    line: &PricedLine,
) -> DbResult<SaleItem> {
    let sql = format!(
        "INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents, subtotal_cents) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         RETURNING {SALE_ITEM_COLUMNS}"
    );

    let item: SaleItem = sqlx::query_as(&sql)
        .bind(sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price.cents())
        .bind(line.subtotal.cents())
        .fetch_one(&mut **tx)
        .await?;

    Ok(item)
}

/// Applies one line to the product's stock.
///
/// The transaction already holds SQLite's write lock (taken by the
/// sequence update), so the stock read here cannot change before the
/// update that follows it.
async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    line: &PricedLine,
    product_name: &str,
    policy: StockPolicy,
) -> DbResult<()> {
    let available: i64 = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
        .bind(line.product_id)
        .fetch_one(&mut **tx)
        .await?;

    if !policy.permits(available, line.quantity) {
        warn!(
            product_id = line.product_id,
            available,
            requested = line.quantity,
            "Sale refused: insufficient stock"
        );
        return Err(CoreError::InsufficientStock {
            product: product_name.to_string(),
            available,
            requested: line.quantity,
        }
        .into());
    }

    sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2")
        .bind(line.quantity)
        .bind(line.product_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
