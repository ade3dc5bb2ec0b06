//! # Invoice Numbers
//!
//! Human-readable sale identifiers of the form `FAC-NNNNN`.
//!
//! ```text
//!   sequence value      invoice number
//!   ──────────────      ──────────────
//!          1       ──►   FAC-00001
//!         42       ──►   FAC-00042
//!     123456       ──►   FAC-123456   (grows past five digits, never wraps)
//! ```
//!
//! The sequence value itself is assigned by the database inside the sale
//! registration transaction; this module only formats and parses.

use crate::error::ValidationError;

/// Prefix shared by every invoice number.
pub const INVOICE_PREFIX: &str = "FAC-";

/// Minimum number of digits after the prefix.
pub const INVOICE_DIGITS: usize = 5;

/// Formats a 1-indexed sequence value as an invoice number.
///
/// ## Example
/// ```rust
/// use inventix_core::invoice::format_invoice_number;
///
/// assert_eq!(format_invoice_number(1), "FAC-00001");
/// assert_eq!(format_invoice_number(99999), "FAC-99999");
/// assert_eq!(format_invoice_number(100000), "FAC-100000");
/// ```
pub fn format_invoice_number(sequence: i64) -> String {
    format!("{INVOICE_PREFIX}{sequence:0width$}", width = INVOICE_DIGITS)
}

/// Parses an invoice number back into its sequence value.
///
/// ## Example
/// ```rust
/// use inventix_core::invoice::parse_invoice_number;
///
/// assert_eq!(parse_invoice_number("FAC-00042").unwrap(), 42);
/// assert!(parse_invoice_number("FAC-42").is_err());
/// assert!(parse_invoice_number("INV-00042").is_err());
/// ```
pub fn parse_invoice_number(invoice: &str) -> Result<i64, ValidationError> {
    let digits = invoice
        .trim()
        .strip_prefix(INVOICE_PREFIX)
        .ok_or_else(|| ValidationError::invalid("invoice_number", "must start with FAC-"))?;

    if digits.len() < INVOICE_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid(
            "invoice_number",
            "must be FAC- followed by at least five digits",
        ));
    }

    let value: i64 = digits
        .parse()
        .map_err(|_| ValidationError::invalid("invoice_number", "sequence is too large"))?;

    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "invoice_number".to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kth_sale_gets_padded_number() {
        for k in 1..=12 {
            assert_eq!(format_invoice_number(k), format!("FAC-{:05}", k));
        }
        assert_eq!(format_invoice_number(7), "FAC-00007");
    }

    #[test]
    fn test_parse_roundtrips_formatted_values() {
        for k in [1, 9, 10, 99999, 100000, 2_000_000] {
            assert_eq!(parse_invoice_number(&format_invoice_number(k)).unwrap(), k);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_invoice_number("").is_err());
        assert!(parse_invoice_number("FAC-").is_err());
        assert!(parse_invoice_number("FAC-0001a").is_err());
        assert!(parse_invoice_number("FAC-00000").is_err());
        assert!(parse_invoice_number("fac-00001").is_err());
    }
}
