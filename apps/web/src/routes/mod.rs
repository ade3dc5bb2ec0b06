//! # Route Handlers
//!
//! ## Module Organization
//! ```text
//! routes/
//! ├── mod.rs        ◄─── Envelope + lenient scalar payload fields
//! ├── dashboard.rs  ◄─── GET /, GET /health
//! ├── clients.rs    ◄─── /clientes, /api/clientes
//! ├── products.rs   ◄─── /productos, /api/productos
//! ├── sales.rs      ◄─── /ventas, /api/ventas
//! └── reports.rs    ◄─── /reportes, /api/reportes/{report}
//! ```
//!
//! Payload keys are the Spanish form-field names the browser UI posts.

pub mod clients;
pub mod dashboard;
pub mod products;
pub mod reports;
pub mod sales;

use inventix_core::{Money, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorCode};

// =============================================================================
// Response Envelope
// =============================================================================

/// Body of every JSON response.
///
/// ```json
/// { "success": true,  "message": "Cliente registrado correctamente", "data": { ... } }
/// { "success": false, "message": "La cédula ya está registrada", "code": "DUPLICATE_IDENTIFICATION" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Envelope {
            success: true,
            message: message.into(),
            code: None,
            data: Some(data),
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            message: message.into(),
            code: Some(code),
            data: None,
        }
    }
}

impl Envelope<()> {
    /// Success with no data, as returned by deletes.
    pub fn done(message: impl Into<String>) -> Self {
        Envelope {
            success: true,
            message: message.into(),
            code: None,
            data: None,
        }
    }
}

// =============================================================================
// Lenient Payload Fields
// =============================================================================

/// A JSON scalar that may arrive as a number or as a string.
///
/// HTML forms post ids and prices as strings (`"3"`, `"10.50"`) while
/// scripted clients send numbers; both are accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// The value as text (numbers are formatted, strings kept as-is).
    pub fn text(&self) -> String {
        match self {
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    /// Reads a whole number (`3`, `3.0`, `"3"`).
    pub fn integer(&self, field: &str) -> Result<i64, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected a whole number, got '{}'", self.text()),
        };

        match self {
            Scalar::Integer(n) => Ok(*n),
            Scalar::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
            Scalar::Float(_) => Err(invalid()),
            Scalar::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        }
    }

    /// Reads a decimal amount of money (`10`, `10.5`, `"10.50"`).
    pub fn money(&self, field: &str) -> Result<Money, ValidationError> {
        let parsed = match self {
            Scalar::Integer(n) => n
                .checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(|| ValidationError::OutOfRange {
                    field: field.to_string(),
                    min: i64::MIN / 100,
                    max: i64::MAX / 100,
                }),
            Scalar::Float(f) => Money::parse_decimal(&f.to_string()),
            Scalar::Text(s) => Money::parse_decimal(s),
        };

        // Report the payload key rather than the parser's generic name
        parsed.map_err(|e| match e {
            ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat {
                field: field.to_string(),
                reason,
            },
            other => other,
        })
    }
}

/// Unwraps a field that must be present.
pub(crate) fn required<'a>(field: &str, value: &'a Option<Scalar>) -> Result<&'a Scalar, ApiError> {
    value.as_ref().ok_or_else(|| {
        ValidationError::Required {
            field: field.to_string(),
        }
        .into()
    })
}

/// Text of an optional field, blank when absent.
pub(crate) fn text_or_empty(value: &Option<Scalar>) -> String {
    value.as_ref().map(Scalar::text).unwrap_or_default()
}

/// Parses a path id, accepting only whole numbers.
pub(crate) fn path_id(raw: &str) -> Result<i64, ApiError> {
    Ok(Scalar::Text(raw.to_string()).integer("id")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(json: &str) -> Scalar {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_scalar_accepts_numbers_and_strings() {
        assert_eq!(scalar("3"), Scalar::Integer(3));
        assert_eq!(scalar("2.5"), Scalar::Float(2.5));
        assert_eq!(scalar("\"7\""), Scalar::Text("7".to_string()));
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(scalar("3").integer("cantidad").unwrap(), 3);
        assert_eq!(scalar("3.0").integer("cantidad").unwrap(), 3);
        assert_eq!(scalar("\" 12 \"").integer("cantidad").unwrap(), 12);
        assert!(scalar("2.5").integer("cantidad").is_err());
        assert!(scalar("\"abc\"").integer("cantidad").is_err());
    }

    #[test]
    fn test_money_parsing() {
        assert_eq!(scalar("10").money("precio").unwrap().cents(), 1000);
        assert_eq!(scalar("10.5").money("precio").unwrap().cents(), 1050);
        assert_eq!(scalar("\"19.99\"").money("precio").unwrap().cents(), 1999);
        assert_eq!(scalar("0.1").money("precio").unwrap().cents(), 10);
    }

    #[test]
    fn test_money_errors_name_the_payload_key() {
        let err = scalar("\"ten\"").money("precio").unwrap_err();
        assert!(err.to_string().starts_with("precio"));
    }

    #[test]
    fn test_path_id() {
        assert_eq!(path_id("42").unwrap(), 42);
        assert!(path_id("x").is_err());
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(Envelope::ok("OK", 5)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 5);
        assert!(ok.get("code").is_none());

        let failed =
            serde_json::to_value(Envelope::<()>::failure(ErrorCode::NotFound, "nope")).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["code"], "NOT_FOUND");
        assert!(failed.get("data").is_none());
    }
}
