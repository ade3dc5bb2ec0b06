//! # Validation Module
//!
//! Input validation for everything the browser can submit.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  ├── `required` attributes, number inputs                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Payload decoding (ids, decimal amounts)                           │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (clients.identification, sales.invoice_number)             │
//! │  └── Foreign keys (restrict deletes of referenced rows)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that accept an input struct return it normalized (trimmed,
//! blank optionals turned into `None`), so the caller stores exactly what
//! was checked.
//!
//! ## Usage
//! ```rust
//! use inventix_core::validation::{validate_quantity, validate_required};
//!
//! assert_eq!(validate_required("name", "  Ana  ", 200).unwrap(), "Ana");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewClient, NewProduct, NewSale};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_SALE_ITEMS, MAX_SALE_TOTAL_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_IDENTIFICATION_LEN: usize = 50;
const MAX_PHONE_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 254;
const MAX_ADDRESS_LEN: usize = 500;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_SUPPLIER_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `max` characters (not bytes, so accented names count right)
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates an optional text field. Blank input becomes `None`.
pub fn validate_optional(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => validate_required(field, v, max).map(Some),
    }
}

/// Validates an email address.
///
/// Only the shape the registration form enforces is checked: non-empty
/// with an `@` that has something on both sides.
///
/// ## Example
/// ```rust
/// use inventix_core::validation::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana.example.com").is_err());
/// assert!(validate_email("@example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = validate_required("email", email, MAX_EMAIL_LEN)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::invalid("email", "must contain '@'")),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a row id (must be positive).
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Sale form: Add line                                                    │
/// │                                                                         │
/// │  User enters cantidad: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → line is priced and recorded                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed (free items), negative is not,
/// and nothing above MAX_PRICE_CENTS.
///
/// ## Example
/// ```rust
/// use inventix_core::money::Money;
/// use inventix_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// assert!(validate_price(Money::from_cents(50_000_000_000_000_000)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    validate_amount("price", price, MAX_PRICE_CENTS)
}

/// Validates a computed sale total against MAX_SALE_TOTAL_CENTS.
pub fn validate_sale_total(total: Money) -> ValidationResult<()> {
    validate_amount("total", total, MAX_SALE_TOTAL_CENTS)
}

fn validate_amount(field: &str, amount: Money, max: i64) -> ValidationResult<()> {
    if amount.is_negative() || amount.cents() > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

/// Validates an initial stock count. Registration starts at zero or above.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates and normalizes a client registration.
pub fn validate_new_client(input: NewClient) -> ValidationResult<NewClient> {
    Ok(NewClient {
        name: validate_required("name", &input.name, MAX_NAME_LEN)?,
        identification: validate_required(
            "identification",
            &input.identification,
            MAX_IDENTIFICATION_LEN,
        )?,
        phone: validate_required("phone", &input.phone, MAX_PHONE_LEN)?,
        email: validate_email(&input.email)?,
        address: validate_required("address", &input.address, MAX_ADDRESS_LEN)?,
    })
}

/// Validates and normalizes a product registration.
pub fn validate_new_product(input: NewProduct) -> ValidationResult<NewProduct> {
    validate_price(input.price)?;
    validate_stock(input.stock)?;

    Ok(NewProduct {
        name: validate_required("name", &input.name, MAX_NAME_LEN)?,
        description: validate_optional(
            "description",
            input.description.as_deref(),
            MAX_DESCRIPTION_LEN,
        )?,
        price: input.price,
        stock: input.stock,
        supplier: validate_optional("supplier", input.supplier.as_deref(), MAX_SUPPLIER_LEN)?,
    })
}

/// Validates the shape of a sale request.
///
/// Existence of the client and products is checked later, inside the
/// registration transaction.
///
/// ## Rules
/// - client id positive
/// - between 1 and MAX_SALE_ITEMS (100) lines
/// - every line: product id positive, quantity 1..=999, quoted price
///   within 0..=MAX_PRICE_CENTS
/// - quoted line subtotals stay within MAX_SALE_TOTAL_CENTS
///
/// Lines priced from the catalog are bounded again by
/// [`crate::sale::total`] once the catalog prices are known.
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    validate_id("client_id", sale.client_id)?;

    if sale.items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if sale.items.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_ITEMS as i64,
        });
    }

    for item in &sale.items {
        validate_id("product_id", item.product_id)?;
        validate_quantity(item.quantity)?;
        if let Some(price) = item.unit_price {
            validate_price(price)?;
            let subtotal = price.checked_multiply_quantity(item.quantity).ok_or_else(|| {
                ValidationError::invalid("subtotal", "amount is too large")
            })?;
            validate_amount("subtotal", subtotal, MAX_SALE_TOTAL_CENTS)?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
