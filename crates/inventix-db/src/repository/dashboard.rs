//! # Dashboard Repository
//!
//! The four numbers on the landing page, read in one round trip.

use sqlx::SqlitePool;
use tracing::debug;

use inventix_core::DashboardStats;

use crate::error::DbResult;

/// Repository for dashboard aggregates.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    /// Reads client, product and sale counts plus the total sold.
    ///
    /// An empty database yields all zeros (the sum is COALESCEd).
    pub async fn stats(&self) -> DbResult<DashboardStats> {
        let (total_clients, total_products, total_sales, total_sold_cents): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM clients),
                    (SELECT COUNT(*) FROM products),
                    (SELECT COUNT(*) FROM sales),
                    (SELECT COALESCE(SUM(total_cents), 0) FROM sales)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let stats = DashboardStats {
            total_clients,
            total_products,
            total_sales,
            total_sold_cents,
        };

        debug!(?stats, "Dashboard stats");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use inventix_core::{DashboardStats, NewSale, NewSaleItem, StockPolicy};

    use crate::repository::test_support::*;

    #[tokio::test]
    async fn test_empty_database_is_all_zero() {
        let db = db().await;
        assert_eq!(db.dashboard().stats().await.unwrap(), DashboardStats::default());
    }

    #[tokio::test]
    async fn test_counts_and_sum() {
        let db = db().await;
        let ana = client(&db, "Ana", "100").await;
        client(&db, "Luis", "200").await;
        let widget = product(&db, "Widget", 1250, 10).await;

        let sold_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        for quantity in [1, 2] {
            let sale = NewSale {
                client_id: ana.id,
                items: vec![NewSaleItem {
                    product_id: widget.id,
                    quantity,
                    unit_price: None,
                    declared_subtotal: None,
                }],
                declared_total: None,
            };
            db.sales()
                .register(&sale, StockPolicy::AllowNegative, sold_at)
                .await
                .unwrap();
        }

        let stats = db.dashboard().stats().await.unwrap();
        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.total_sales, 2);
        assert_eq!(stats.total_sold_cents, 3750);
    }
}
