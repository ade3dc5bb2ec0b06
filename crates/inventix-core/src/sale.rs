//! # Sale Pricing and Stock Policy
//!
//! The pure half of sale registration. The database layer loads the
//! catalog prices inside its transaction and hands them to
//! [`price_lines`]; everything that decides *what* gets stored lives here.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewSaleItem { product_id: 1, quantity: 2, unit_price: None }           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog[1] = $10.00   (used because the caller quoted no price)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricedLine { unit_price: $10.00, subtotal: $20.00 }                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total(lines) = Σ subtotal   ← the ONLY total that is stored            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::NewSaleItem;
use crate::validation::validate_sale_total;

// =============================================================================
// Stock Policy
// =============================================================================

/// What happens when a sale asks for more units than are on hand.
///
/// ## Policies
/// ```text
/// stock = 3, requested = 5
///
///   AllowNegative ──► sale recorded, stock becomes -2
///   Reject        ──► InsufficientStock, nothing recorded
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Stock may go below zero (historical behaviour).
    #[default]
    AllowNegative,
    /// A line that would drive stock below zero aborts the sale.
    Reject,
}

impl StockPolicy {
    /// Returns true if selling `requested` units is allowed with
    /// `available` on hand.
    ///
    /// ## Example
    /// ```rust
    /// use inventix_core::StockPolicy;
    ///
    /// assert!(StockPolicy::AllowNegative.permits(0, 10));
    /// assert!(StockPolicy::Reject.permits(5, 5));
    /// assert!(!StockPolicy::Reject.permits(3, 5));
    /// ```
    #[inline]
    pub fn permits(&self, available: i64, requested: i64) -> bool {
        match self {
            StockPolicy::AllowNegative => true,
            StockPolicy::Reject => available >= requested,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockPolicy::AllowNegative => "allow_negative",
            StockPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_negative" => Ok(StockPolicy::AllowNegative),
            "reject" => Ok(StockPolicy::Reject),
            other => Err(ValidationError::InvalidFormat {
                field: "stock_policy".to_string(),
                reason: format!("unknown policy '{other}', expected allow_negative or reject"),
            }),
        }
    }
}

// =============================================================================
// Line Pricing
// =============================================================================

/// A sale line with its final unit price and subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Prices every requested line.
///
/// The caller's quoted price wins when present; otherwise the catalog
/// price is used. Every referenced product must be in `catalog`.
pub fn price_lines(
    items: &[NewSaleItem],
    catalog: &HashMap<i64, Money>,
) -> CoreResult<Vec<PricedLine>> {
    items
        .iter()
        .map(|item| {
            let catalog_price = catalog
                .get(&item.product_id)
                .copied()
                .ok_or(CoreError::ProductNotFound(item.product_id))?;

            let unit_price = item.unit_price.unwrap_or(catalog_price);
            let subtotal = unit_price
                .checked_multiply_quantity(item.quantity)
                .ok_or_else(|| amount_overflow("subtotal"))?;

            Ok(PricedLine {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price,
                subtotal,
            })
        })
        .collect()
}

/// Sums the subtotals of priced lines.
///
/// The result is bounded by [`crate::MAX_SALE_TOTAL_CENTS`].
pub fn total(lines: &[PricedLine]) -> CoreResult<Money> {
    let sum = lines.iter().try_fold(Money::zero(), |acc, line| {
        acc.checked_add(line.subtotal)
            .ok_or_else(|| amount_overflow("total"))
    })?;
    validate_sale_total(sum)?;
    Ok(sum)
}

fn amount_overflow(field: &str) -> CoreError {
    CoreError::Validation(ValidationError::invalid(field, "amount is too large"))
}

// =============================================================================
// Unit Tests
// =============================================================================
