//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Inventix                               │
//! │                                                                         │
//! │  Browser                     Rust Backend                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  fetch('/api/clientes', { method: 'POST', body })                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<Envelope<T>>, ApiError>                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Malformed JSON? ──── JsonRejection ──────────────┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Database Error? ──── DbError::UniqueViolation ── ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── HTTP 400                                                         │
//! │        { "success": false,                                              │
//! │          "message": "La cédula ya está registrada",                     │
//! │          "code": "DUPLICATE_IDENTIFICATION" }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is a 400 with the same envelope a success uses, so the
//! browser only ever checks `success`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inventix_core::{CoreError, ValidationError};
use inventix_db::DbError;
use inventix_report::ReportError;
use serde::Serialize;
use tracing::{error, warn};

use crate::routes::Envelope;

/// API error returned from route handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes carried in the failure envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request body was not valid JSON of the expected shape
    InvalidPayload,

    /// Input validation failed
    ValidationError,

    /// A referenced client, product or report does not exist
    NotFound,

    /// A client with this identification already exists
    DuplicateIdentification,

    /// Two sales collided on the same invoice number
    DuplicateInvoice,

    /// Any other unique constraint
    Duplicate,

    /// Delete refused because recorded sales point at the row
    ReferencedRecord,

    /// A sale line asked for more than the stock on hand
    InsufficientStock,

    /// Database operation failed
    DatabaseError,

    /// Spreadsheet or PDF rendering failed
    ReportError,

    /// Internal server error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Maps a failed delete, naming the row that is still referenced.
    pub fn from_delete(err: DbError, resource: &str, id: i64) -> Self {
        match err {
            DbError::ForeignKeyViolation { .. } => ApiError::new(
                ErrorCode::ReferencedRecord,
                format!("{resource} {id} is referenced by recorded sales"),
            ),
            other => other.into(),
        }
    }
}

/// Converts database errors to API errors.
///
/// Constraint violations get a specific code; any other failure keeps the
/// underlying error text.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Rule(core) => core.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field } if field == "clients.identification" => {
                ApiError::new(
                    ErrorCode::DuplicateIdentification,
                    "La cédula ya está registrada",
                )
            }
            DbError::UniqueViolation { field } if field == "sales.invoice_number" => {
                warn!("Invoice number collision");
                ApiError::new(ErrorCode::DuplicateInvoice, "Invoice number already exists")
            }
            DbError::UniqueViolation { field } => {
                ApiError::new(ErrorCode::Duplicate, format!("Duplicate {field}"))
            }
            DbError::ForeignKeyViolation { .. } => ApiError::new(
                ErrorCode::ReferencedRecord,
                "Record is referenced by recorded sales",
            ),
            other => {
                error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, other.to_string())
            }
        }
    }
}

/// Converts business-rule errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ClientNotFound(id) => ApiError::not_found("Client", &id.to_string()),
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id.to_string()),
            err @ CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        error!(error = %err, "Report rendering failed");
        ApiError::new(ErrorCode::ReportError, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::InvalidPayload, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::failure(self.code, self.message);
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Errors that stop the server from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
