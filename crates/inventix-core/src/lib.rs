//! # inventix-core: Pure Business Logic for Inventix
//!
//! This crate contains the domain model and every business rule of the
//! inventory/sales application as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Inventix Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI (HTML + JS)                       │   │
//! │  │     Clients ──► Products ──► Sale form ──► Reports             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/web (axum routes)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ inventix-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │ invoice  │ │ sale/validation  │  │   │
//! │  │   │ Client   │ │  Money   │ │ FAC-NNNNN│ │ pricing, rules   │  │   │
//! │  │   │ Product  │ │ (cents)  │ │          │ │ StockPolicy      │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          inventix-db / inventix-report (I/O + rendering)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Client, Product, Sale, SaleItem, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - Invoice number formatting and parsing
//! - [`sale`] - Sale line pricing and the stock policy
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use inventix_core::invoice::format_invoice_number;
//! use inventix_core::money::Money;
//!
//! let price = Money::parse_decimal("10.00").unwrap();
//! let subtotal = price.checked_multiply_quantity(2).unwrap();
//! assert_eq!(subtotal.to_currency_string(), "$20.00");
//!
//! assert_eq!(format_invoice_number(1), "FAC-00001");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use sale::StockPolicy;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted, in cents ($99,999,999.99).
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Highest sale total accepted, in cents ($9,999,999,999.99).
///
/// Keeps every stored total and the sums over them far from `i64::MAX`.
pub const MAX_SALE_TOTAL_CENTS: i64 = 999_999_999_999;
