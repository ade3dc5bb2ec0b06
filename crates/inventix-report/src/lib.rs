//! # Inventix Report
//!
//! Downloadable sales and inventory documents.
//!
//! ## Pipeline
//! ```text
//! ┌──────────────────┐      ┌───────────────┐      ┌──────────────────┐
//! │ Vec<SaleSummary> │      │               │ ───► │ xlsx::render     │ ──► .xlsx
//! │ Vec<Product>     │ ───► │  ReportTable  │      └──────────────────┘
//! └──────────────────┘      │               │      ┌──────────────────┐
//!                           └───────────────┘ ───► │ pdf::render      │ ──► .pdf
//!                                                  └──────────────────┘
//! ```
//!
//! The caller fetches the rows and picks the date used in the file name;
//! this crate does no I/O of its own.

pub mod error;
pub mod pdf;
pub mod table;
pub mod xlsx;

pub use error::{ReportError, ReportResult};
pub use table::{Cell, Column, ReportFormat, ReportKind, ReportTable, Rgb};

/// Renders `table` in the requested format.
pub fn render(table: &ReportTable, format: ReportFormat) -> ReportResult<Vec<u8>> {
    match format {
        ReportFormat::Xlsx => xlsx::render(table),
        ReportFormat::Pdf => pdf::render(table),
    }
}
