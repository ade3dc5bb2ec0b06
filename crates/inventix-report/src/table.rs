//! # Report Table Model
//!
//! A format-neutral description of a report: which columns, which rows,
//! and the optional totals line. Both encoders render from this and
//! nothing else, so the spreadsheet and the PDF always agree.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReportTable::sales(&summaries)                                         │
//! │                                                                         │
//! │   Factura    │ Cliente      │ Total      │ Fecha      │ Hora            │
//! │  ────────────┼──────────────┼────────────┼────────────┼──────────       │
//! │   FAC-00002  │ Luis         │ $20.00     │ 2024-05-03 │ 08:15:30        │
//! │   FAC-00001  │ Ana          │ $40.00     │ 2024-05-01 │ 10:15:30        │
//! │                                                                         │
//! │   TOTAL      │              │ $60.00     │            │                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use inventix_core::{Money, Product, SaleSummary};

use crate::error::{ReportError, ReportResult};

// =============================================================================
// Report Kind / Format
// =============================================================================

/// The two reports the application can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Sales,
    Inventory,
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Xlsx,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }

    /// MIME type for the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }
}

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `0xRRGGBB`, the form the spreadsheet writer takes.
    pub fn to_hex(&self) -> u32 {
        (u32::from(self.0) << 16) | (u32::from(self.1) << 8) | u32::from(self.2)
    }

    /// Components scaled to 0.0..=1.0 for PDF colour operators.
    pub fn to_unit(&self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

impl ReportKind {
    /// Heading printed above the PDF table.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Sales => "REPORTE DE VENTAS",
            ReportKind::Inventory => "REPORTE DE INVENTARIO",
        }
    }

    /// Worksheet name.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Ventas",
            ReportKind::Inventory => "Inventario",
        }
    }

    /// Header fill and title colour.
    pub fn accent(&self) -> Rgb {
        match self {
            // #4CAF50
            ReportKind::Sales => Rgb(0x4C, 0xAF, 0x50),
            // #2196F3
            ReportKind::Inventory => Rgb(0x21, 0x96, 0xF3),
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            ReportKind::Sales => "Reporte_Ventas",
            ReportKind::Inventory => "Reporte_Inventario",
        }
    }

    /// Download name stamped with the given date.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use inventix_report::{ReportFormat, ReportKind};
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    /// assert_eq!(
    ///     ReportKind::Sales.file_name(day, ReportFormat::Xlsx),
    ///     "Reporte_Ventas_20240501.xlsx"
    /// );
    /// ```
    pub fn file_name(&self, date: NaiveDate, format: ReportFormat) -> String {
        format!(
            "{}_{}.{}",
            self.file_stem(),
            date.format("%Y%m%d"),
            format.extension()
        )
    }
}

// =============================================================================
// Columns and Cells
// =============================================================================

/// One report column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: &'static str,
    /// Spreadsheet width in character units. PDF widths are scaled from it.
    pub width: f64,
}

impl Column {
    const fn new(title: &'static str, width: f64) -> Self {
        Column { title, width }
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Money(Money),
    Integer(i64),
    Empty,
}

impl Cell {
    /// Text shown in the PDF (and used for plain-text previews).
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Money(m) => m.to_currency_string(),
            Cell::Integer(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Cell {
    value.map(text).unwrap_or(Cell::Empty)
}

// =============================================================================
// Report Table
// =============================================================================

/// Everything an encoder needs to render one report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
    /// Sales only: `TOTAL` row summing the Total column.
    pub totals: Option<Vec<Cell>>,
}

impl ReportTable {
    /// Builds the sales report, keeping the row order given
    /// (the repository returns newest first).
    ///
    /// Fails with [`ReportError::TotalOverflow`] when the TOTAL row
    /// cannot be represented.
    pub fn sales(summaries: &[SaleSummary]) -> ReportResult<Self> {
        let rows = summaries
            .iter()
            .map(|s| {
                vec![
                    text(&s.invoice_number),
                    text(&s.client_name),
                    Cell::Money(s.total()),
                    text(&s.sale_date),
                    text(&s.sale_time),
                ]
            })
            .collect();

        let total = summaries
            .iter()
            .try_fold(Money::zero(), |acc, s| acc.checked_add(s.total()))
            .ok_or(ReportError::TotalOverflow { column: "Total" })?;

        Ok(ReportTable {
            kind: ReportKind::Sales,
            columns: vec![
                Column::new("Factura", 15.0),
                Column::new("Cliente", 25.0),
                Column::new("Total", 15.0),
                Column::new("Fecha", 15.0),
                Column::new("Hora", 12.0),
            ],
            rows,
            totals: Some(vec![
                text("TOTAL"),
                Cell::Empty,
                Cell::Money(total),
                Cell::Empty,
                Cell::Empty,
            ]),
        })
    }

    /// Builds the inventory report from products sorted by name.
    pub fn inventory(products: &[Product]) -> Self {
        let rows = products
            .iter()
            .map(|p| {
                vec![
                    text(&p.name),
                    optional_text(p.description.as_deref()),
                    Cell::Money(p.price()),
                    Cell::Integer(p.stock),
                    optional_text(p.supplier.as_deref()),
                ]
            })
            .collect();

        ReportTable {
            kind: ReportKind::Inventory,
            columns: vec![
                Column::new("Producto", 25.0),
                Column::new("Descripción", 30.0),
                Column::new("Precio", 12.0),
                Column::new("Stock", 10.0),
                Column::new("Proveedor", 20.0),
            ],
            rows,
            totals: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(invoice: &str, cents: i64) -> SaleSummary {
        SaleSummary {
            invoice_number: invoice.to_string(),
            client_name: "Ana".to_string(),
            total_cents: cents,
            sale_date: "2024-05-01".to_string(),
            sale_time: "10:00:00".to_string(),
        }
    }

    #[test]
    fn test_sales_totals_row_sums_totals() {
        let table =
            ReportTable::sales(&[summary("FAC-00001", 4000), summary("FAC-00002", 2050)]).unwrap();

        assert_eq!(table.rows.len(), 2);
        let totals = table.totals.unwrap();
        assert_eq!(totals[0], Cell::Text("TOTAL".to_string()));
        assert_eq!(totals[2], Cell::Money(Money::from_cents(6050)));
        assert_eq!(totals[2].display(), "$60.50");
    }

    #[test]
    fn test_empty_sales_still_has_zero_total() {
        let table = ReportTable::sales(&[]).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.totals.unwrap()[2], Cell::Money(Money::zero()));
    }

    #[test]
    fn test_sales_total_overflow_is_an_error() {
        let half = i64::MAX / 2 + 1;
        let err = ReportTable::sales(&[summary("FAC-00001", half), summary("FAC-00002", half)])
            .unwrap_err();
        assert!(matches!(err, ReportError::TotalOverflow { column: "Total" }));
        assert_eq!(err.to_string(), "Total column sum is too large to report");
    }

    #[test]
    fn test_inventory_has_no_totals_and_blank_optionals() {
        let product = Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            price_cents: 1234,
            stock: -2,
            supplier: Some("ACME".to_string()),
            created_at: Utc::now(),
        };
        let table = ReportTable::inventory(&[product]);

        assert!(table.totals.is_none());
        assert_eq!(table.columns[1].title, "Descripción");
        assert_eq!(table.rows[0][1], Cell::Empty);
        assert_eq!(table.rows[0][3].display(), "-2");
        assert_eq!(table.rows[0][4].display(), "ACME");
    }

    #[test]
    fn test_file_names() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            ReportKind::Inventory.file_name(day, ReportFormat::Pdf),
            "Reporte_Inventario_20241231.pdf"
        );
        assert_eq!(
            ReportKind::Sales.file_name(day, ReportFormat::Pdf),
            "Reporte_Ventas_20241231.pdf"
        );
    }

    #[test]
    fn test_accent_colours() {
        assert_eq!(ReportKind::Sales.accent().to_hex(), 0x4CAF50);
        assert_eq!(ReportKind::Inventory.accent().to_hex(), 0x2196F3);
    }
}
