//! # Domain Types
//!
//! Core domain types used throughout Inventix.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Client      │   │      Sale       │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │◄──│  client_id (FK) │   │  id (i64)       │       │
//! │  │  identification │   │  invoice_number │   │  name           │       │
//! │  │  (unique)       │   │  total_cents    │   │  price_cents    │       │
//! │  └─────────────────┘   └────────┬────────┘   │  stock          │       │
//! │                                 │ owns       └────────▲────────┘       │
//! │                        ┌────────▼────────┐            │                │
//! │                        │    SaleItem     │────────────┘                │
//! │                        │  quantity       │  references                 │
//! │                        │  unit_price     │                             │
//! │                        │  subtotal       │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Types vs Input Types
//! - `Client`, `Product`, `Sale`, `SaleItem`: rows as stored (ids assigned)
//! - `NewClient`, `NewProduct`, `NewSale`: validated input, no id yet
//! - `SaleSummary`, `DashboardStats`: read models for lists and reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Client
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    pub id: i64,

    /// Legal name.
    pub name: String,

    /// National identification number. Unique across all clients.
    pub identification: String,

    pub phone: String,
    pub email: String,
    pub address: String,

    /// When the client was registered.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for registering a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub identification: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name, also the sort key of every listing.
    pub name: String,

    pub description: Option<String>,

    /// Unit price in cents. Never negative.
    pub price_cents: i64,

    /// Units on hand. May go negative under the default stock policy.
    pub stock: i64,

    pub supplier: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for registering a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock: i64,
    pub supplier: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale header.
///
/// Sales are created only through the registration transaction and are
/// never updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,

    /// Human-readable invoice number (`FAC-00001`).
    pub invoice_number: String,

    pub client_id: i64,

    /// Sum of the line subtotals, in cents.
    pub total_cents: i64,

    /// Local date of the sale (`YYYY-MM-DD`).
    pub sale_date: String,

    /// Local time of the sale (`HH:MM:SS`).
    pub sale_time: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
///
/// The unit price is frozen at the time of sale, so later catalog price
/// changes never alter historical totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// unit_price × quantity
    pub subtotal_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// One requested line of a new sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSaleItem {
    pub product_id: i64,
    pub quantity: i64,

    /// Price the caller quoted. Falls back to the catalog price when absent.
    pub unit_price: Option<Money>,

    /// Subtotal the caller computed. Advisory only, never stored.
    pub declared_subtotal: Option<Money>,
}

/// A sale registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub client_id: i64,
    pub items: Vec<NewSaleItem>,

    /// Total the caller computed. Advisory only; the stored total is the
    /// sum of the priced lines.
    pub declared_total: Option<Money>,
}

/// The outcome of a successful registration: header plus its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecordedSale {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Read Models
// =============================================================================

/// One row of the sales listing and the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleSummary {
    pub invoice_number: String,
    pub client_name: String,
    pub total_cents: i64,
    pub sale_date: String,
    pub sale_time: String,
}

impl SaleSummary {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// Dashboard aggregates. All zero on an empty database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub total_products: i64,
    pub total_sales: i64,
    pub total_sold_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
