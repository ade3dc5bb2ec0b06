//! # Repository Module
//!
//! Database repository implementations for Inventix.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().register(&new_sale, policy, now)                   │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── register(&self, sale, policy, sold_at)   (one transaction)        │
//! │  ├── list_summaries(&self)                                             │
//! │  └── next_invoice_preview(&self)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every repository owns a clone of the pool; they are cheap to create   │
//! │  and are built per request from `Database`.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ClientRepository`](client::ClientRepository) - Client registration, listing, deletion
//! - [`ProductRepository`](product::ProductRepository) - Product registration, listing, deletion
//! - [`SaleRepository`](sale::SaleRepository) - Sale registration and sale reads
//! - [`DashboardRepository`](dashboard::DashboardRepository) - Aggregate counts and sums

pub mod client;
pub mod dashboard;
pub mod product;
pub mod sale;

/// Column list shared by every query that returns a full `Product`.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, description, price_cents, stock, supplier, created_at";

/// Column list shared by every query that returns a full `Client`.
pub(crate) const CLIENT_COLUMNS: &str =
    "id, name, identification, phone, email, address, created_at";

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the repository tests.

    use inventix_core::{Client, Money, NewClient, NewProduct, Product};

    use crate::{Database, DbConfig};

    pub async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn new_client(name: &str, identification: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            identification: identification.to_string(),
            phone: "0999999999".to_string(),
            email: format!("{}@example.com", identification),
            address: "Main St 1".to_string(),
        }
    }

    pub fn new_product(name: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price: Money::from_cents(price_cents),
            stock,
            supplier: None,
        }
    }

    pub async fn client(db: &Database, name: &str, identification: &str) -> Client {
        db.clients()
            .insert(&new_client(name, identification))
            .await
            .unwrap()
    }

    pub async fn product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        db.products()
            .insert(&new_product(name, price_cents, stock))
            .await
            .unwrap()
    }
}
