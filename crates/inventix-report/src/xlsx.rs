//! # Spreadsheet Encoder
//!
//! Renders a [`ReportTable`] as a single-sheet `.xlsx` workbook.
//!
//! ```text
//!   row 0   │ header, accent fill, bold white 11pt, centred │
//!   row 1.. │ one row per record                            │
//!   row n+1 │ (blank)                                       │  sales only
//!   row n+2 │ TOTAL │     │ Σ Total │     │                 │  sales only
//! ```
//!
//! Money cells are real numbers with a `#,##0.00` format so the sheet
//! can still be summed and filtered after download.

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use tracing::debug;

use crate::error::ReportResult;
use crate::table::{Cell, ReportTable};

const MONEY_FORMAT: &str = "#,##0.00";

/// Encodes the table as `.xlsx` bytes.
pub fn render(table: &ReportTable) -> ReportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(table.kind.sheet_name())?;

    let header = Format::new()
        .set_bold()
        .set_font_size(11)
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(table.kind.accent().to_hex()))
        .set_align(FormatAlign::Center);
    let money = Format::new().set_num_format(MONEY_FORMAT);
    let total_label = Format::new().set_bold();
    let total_money = Format::new().set_bold().set_num_format(MONEY_FORMAT);

    for (col, column) in table.columns.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, column.title, &header)?;
        sheet.set_column_width(col, column.width)?;
    }

    for (idx, row) in table.rows.iter().enumerate() {
        write_row(sheet, idx as u32 + 1, row, None, &money)?;
    }

    if let Some(totals) = &table.totals {
        // One blank row between the data and the totals
        let row = table.rows.len() as u32 + 2;
        write_row(sheet, row, totals, Some(&total_label), &total_money)?;
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(
        report = table.kind.sheet_name(),
        rows = table.rows.len(),
        bytes = bytes.len(),
        "Rendered spreadsheet"
    );
    Ok(bytes)
}

fn write_row(
    sheet: &mut Worksheet,
    row: u32,
    cells: &[Cell],
    text_format: Option<&Format>,
    money_format: &Format,
) -> ReportResult<()> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match (cell, text_format) {
            (Cell::Text(value), Some(format)) => {
                sheet.write_string_with_format(row, col, value, format)?;
            }
            (Cell::Text(value), None) => {
                sheet.write_string(row, col, value)?;
            }
            (Cell::Money(amount), _) => {
                let value = amount.cents() as f64 / 100.0;
                sheet.write_number_with_format(row, col, value, money_format)?;
            }
            (Cell::Integer(value), _) => {
                sheet.write_number(row, col, *value as f64)?;
            }
            (Cell::Empty, _) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventix_core::SaleSummary;
    use std::io::{Cursor, Read};

    fn summary(invoice: &str, cents: i64) -> SaleSummary {
        SaleSummary {
            invoice_number: invoice.to_string(),
            client_name: "Ana".to_string(),
            total_cents: cents,
            sale_date: "2024-05-01".to_string(),
            sale_time: "10:00:00".to_string(),
        }
    }

    /// Unpacked sheet XML plus the shared string table.
    struct Sheet {
        xml: String,
        strings: Vec<String>,
    }

    fn unpack(bytes: Vec<u8>) -> Sheet {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut read = |name: &str| {
            let mut out = String::new();
            archive
                .by_name(name)
                .unwrap()
                .read_to_string(&mut out)
                .unwrap();
            out
        };
        let xml = read("xl/worksheets/sheet1.xml");
        let shared = read("xl/sharedStrings.xml");

        let strings = shared
            .split("<si>")
            .skip(1)
            .map(|si| {
                let open = si.find("<t").unwrap();
                let start = open + si[open..].find('>').unwrap() + 1;
                let end = si.find("</t>").unwrap();
                si[start..end].to_string()
            })
            .collect();

        Sheet { xml, strings }
    }

    impl Sheet {
        /// Raw `<v>` content of a cell, `None` when the cell is absent.
        fn raw(&self, reference: &str) -> Option<(bool, String)> {
            let tag = format!("<c r=\"{reference}\"");
            let start = self.xml.find(&tag)?;
            let rest = &self.xml[start..];
            let end = rest.find("</c>").unwrap_or(rest.len());
            let cell = &rest[..end];
            let shared = cell.contains("t=\"s\"");
            let value = cell
                .split_once("<v>")
                .and_then(|(_, v)| v.split_once("</v>"))
                .map(|(v, _)| v.to_string())
                .unwrap_or_default();
            Some((shared, value))
        }

        fn text(&self, reference: &str) -> Option<String> {
            let (shared, value) = self.raw(reference)?;
            assert!(shared, "{reference} is not a string cell");
            Some(self.strings[value.parse::<usize>().unwrap()].clone())
        }

        fn number(&self, reference: &str) -> Option<f64> {
            let (shared, value) = self.raw(reference)?;
            assert!(!shared, "{reference} is not a number cell");
            Some(value.parse().unwrap())
        }

        fn has_row(&self, row: u32) -> bool {
            self.xml.contains(&format!("<row r=\"{row}\""))
        }

        /// Width of every column, left to right. A `<col>` entry may
        /// cover a `min..=max` range of equal columns.
        fn column_widths(&self) -> Vec<f64> {
            self.xml
                .split("<col ")
                .skip(1)
                .flat_map(|col| {
                    let attr = |name: &str| {
                        let key = format!(" {name}=\"");
                        let padded = format!(" {col}");
                        let start = padded.find(&key).unwrap() + key.len();
                        let len = padded[start..].find('"').unwrap();
                        padded[start..start + len].to_string()
                    };
                    let min: usize = attr("min").parse().unwrap();
                    let max: usize = attr("max").parse().unwrap();
                    let width: f64 = attr("width").parse().unwrap();
                    std::iter::repeat(width).take(max - min + 1)
                })
                .collect()
        }
    }

    #[test]
    fn test_renders_a_zip_container() {
        let bytes = render(&ReportTable::sales(&[summary("FAC-00001", 4000)]).unwrap()).unwrap();
        // Every .xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_sales_sheet_layout() {
        let table =
            ReportTable::sales(&[summary("FAC-00002", 2050), summary("FAC-00001", 4000)]).unwrap();
        let sheet = unpack(render(&table).unwrap());

        // Header on the first row
        let headers: Vec<_> = ["A1", "B1", "C1", "D1", "E1"]
            .iter()
            .map(|r| sheet.text(r).unwrap())
            .collect();
        assert_eq!(headers, ["Factura", "Cliente", "Total", "Fecha", "Hora"]);

        // Data straight below, in the order given
        assert_eq!(sheet.text("A2").unwrap(), "FAC-00002");
        assert_eq!(sheet.number("C2"), Some(20.5));
        assert_eq!(sheet.text("A3").unwrap(), "FAC-00001");
        assert_eq!(sheet.text("B3").unwrap(), "Ana");
        assert_eq!(sheet.number("C3"), Some(40.0));
        assert_eq!(sheet.text("E3").unwrap(), "10:00:00");

        // One blank row, then TOTAL
        assert!(!sheet.has_row(4));
        assert_eq!(sheet.text("A5").unwrap(), "TOTAL");
        assert_eq!(sheet.raw("B5"), None);
        assert_eq!(sheet.number("C5"), Some(60.5));
        assert!(!sheet.has_row(6));
    }

    #[test]
    fn test_empty_sales_sheet_has_zero_total() {
        let sheet = unpack(render(&ReportTable::sales(&[]).unwrap()).unwrap());

        assert_eq!(sheet.text("A1").unwrap(), "Factura");
        assert!(!sheet.has_row(2));
        assert_eq!(sheet.text("A3").unwrap(), "TOTAL");
        assert_eq!(sheet.number("C3"), Some(0.0));
    }

    #[test]
    fn test_column_widths_follow_the_table() {
        let sales = unpack(render(&ReportTable::sales(&[]).unwrap()).unwrap());
        let inventory = unpack(render(&ReportTable::inventory(&[])).unwrap());

        for (sheet, expected) in [
            (&sales, [15.0, 25.0, 15.0, 15.0, 12.0]),
            (&inventory, [25.0, 30.0, 12.0, 10.0, 20.0]),
        ] {
            let widths = sheet.column_widths();
            assert_eq!(widths.len(), 5);
            for (col, (width, want)) in widths.iter().zip(expected).enumerate() {
                // The writer stores character widths plus cell padding
                assert!(
                    *width >= want && *width < want + 1.0,
                    "column {col}: {width} vs {want}"
                );
            }
        }
    }

    #[test]
    fn test_inventory_sheet_has_no_totals() {
        let product = inventix_core::Product {
            id: 1,
            name: "Widget".to_string(),
            description: None,
            price_cents: 1234,
            stock: 7,
            supplier: Some("ACME".to_string()),
            created_at: chrono::Utc::now(),
        };
        let sheet = unpack(render(&ReportTable::inventory(&[product])).unwrap());

        assert_eq!(sheet.text("B1").unwrap(), "Descripción");
        assert_eq!(sheet.text("A2").unwrap(), "Widget");
        assert_eq!(sheet.raw("B2"), None);
        assert_eq!(sheet.number("C2"), Some(12.34));
        assert_eq!(sheet.number("D2"), Some(7.0));
        assert_eq!(sheet.text("E2").unwrap(), "ACME");
        assert!(!sheet.has_row(3));
        assert!(!sheet.strings.iter().any(|s| s == "TOTAL"));
    }
}
