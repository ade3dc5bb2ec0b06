//! Report rendering errors.

use thiserror::Error;

/// Failure while encoding a report document.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The spreadsheet writer rejected a cell, format or the final save.
    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// The PDF could not be assembled or serialized.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// A summed column no longer fits in an `i64` of cents.
    #[error("{column} column sum is too large to report")]
    TotalOverflow { column: &'static str },
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::Pdf(err.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Pdf(err.to_string())
    }
}

/// Result type for report rendering.
pub type ReportResult<T> = Result<T, ReportError>;
