//! # PDF Encoder
//!
//! Renders a [`ReportTable`] as a paginated US Letter PDF using the
//! built-in Helvetica fonts, so no font files are embedded.
//!
//! ## Page Layout
//! ```text
//!   612 × 792 pt, 72 pt margins, table spans the 468 pt between them
//!
//!   ┌──────────────────────────────────────────┐
//!   │  REPORTE DE VENTAS        ← 20pt, accent │  first page only
//!   │                                          │
//!   │ ┌────────┬────────┬───────┬──────┬─────┐ │
//!   │ │Factura │Cliente │ Total │Fecha │Hora │ │  accent fill, white bold
//!   │ ├────────┼────────┼───────┼──────┼─────┤ │
//!   │ │  ...   │  ...   │  ...  │ ...  │ ... │ │  10pt, centred, 1pt grid
//!   │ ├────────┼────────┼───────┼──────┼─────┤ │
//!   │ │ TOTAL  │        │$60.00 │      │     │ │  accent fill (sales)
//!   │ └────────┴────────┴───────┴──────┴─────┘ │
//!   └──────────────────────────────────────────┘
//!   Rows that do not fit start a new page, which repeats the header row.
//! ```
//!
//! ## Determinism
//! The document carries no creation date, producer or random file id, and
//! streams are left uncompressed. Identical tables give identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::error::ReportResult;
use crate::table::{Cell, ReportTable, Rgb};

// =============================================================================
// Layout Constants
// =============================================================================

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const MARGIN: f64 = 72.0;
const TABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f64 = 20.0;
/// Gap between the title baseline and the top of the table.
const TITLE_GAP: f64 = 48.0;

const HEADER_SIZE: f64 = 12.0;
const HEADER_HEIGHT: f64 = 24.0;
const BODY_SIZE: f64 = 10.0;
const ROW_HEIGHT: f64 = 18.0;
const CELL_PADDING: f64 = 3.0;

const WHITE_SMOKE: Rgb = Rgb(245, 245, 245);
const BLACK: Rgb = Rgb(0, 0, 0);

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

// =============================================================================
// Rendering
// =============================================================================

/// How a row is painted.
#[derive(Clone, Copy)]
struct RowStyle {
    fill: Option<Rgb>,
    text: Rgb,
    bold: bool,
    size: f64,
    height: f64,
}

/// Encodes the table as PDF bytes.
pub fn render(table: &ReportTable) -> ReportResult<Vec<u8>> {
    let accent = table.kind.accent();
    let widths = column_widths(table);

    let header_cells: Vec<String> = table.columns.iter().map(|c| c.title.to_string()).collect();
    let header_style = RowStyle {
        fill: Some(accent),
        text: WHITE_SMOKE,
        bold: true,
        size: HEADER_SIZE,
        height: HEADER_HEIGHT,
    };
    let body_style = RowStyle {
        fill: None,
        text: BLACK,
        bold: false,
        size: BODY_SIZE,
        height: ROW_HEIGHT,
    };
    let totals_style = RowStyle {
        fill: Some(accent),
        text: WHITE_SMOKE,
        bold: true,
        ..body_style
    };

    let body = table
        .rows
        .iter()
        .map(|row| (display_row(row), body_style))
        .chain(
            table
                .totals
                .iter()
                .map(|row| (display_row(row), totals_style)),
        );

    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let mut ops = Vec::new();

    title(&mut ops, table.kind.title(), accent);
    let mut y = PAGE_HEIGHT - MARGIN - TITLE_SIZE - TITLE_GAP;
    draw_row(&mut ops, &header_cells, &widths, y, header_style);
    y -= HEADER_HEIGHT;

    for (cells, style) in body {
        if y - style.height < MARGIN {
            pages.push(std::mem::take(&mut ops));
            y = PAGE_HEIGHT - MARGIN;
            draw_row(&mut ops, &header_cells, &widths, y, header_style);
            y -= HEADER_HEIGHT;
        }
        draw_row(&mut ops, &cells, &widths, y, style);
        y -= style.height;
    }
    pages.push(ops);

    let bytes = assemble(pages)?;
    debug!(
        report = table.kind.title(),
        rows = table.rows.len(),
        bytes = bytes.len(),
        "Rendered PDF"
    );
    Ok(bytes)
}

/// Builds the document object graph and serializes it.
fn assemble(pages: Vec<Vec<Operation>>) -> ReportResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular,
            FONT_BOLD => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let stream = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => stream,
        });
        kids.push(page.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH as i64),
                Object::Integer(PAGE_HEIGHT as i64),
            ],
        }),
    );

    let catalog = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

/// Scales the spreadsheet widths to fill the printable width.
fn column_widths(table: &ReportTable) -> Vec<f64> {
    let total: f64 = table.columns.iter().map(|c| c.width).sum();
    if total <= 0.0 {
        return vec![0.0; table.columns.len()];
    }
    table
        .columns
        .iter()
        .map(|c| c.width / total * TABLE_WIDTH)
        .collect()
}

fn display_row(cells: &[Cell]) -> Vec<String> {
    cells.iter().map(Cell::display).collect()
}

// =============================================================================
// Drawing Primitives
// =============================================================================

fn title(ops: &mut Vec<Operation>, text: &str, colour: Rgb) {
    ops.push(fill_colour(colour));
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![FONT_BOLD.into(), Object::Integer(TITLE_SIZE as i64)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![
            Object::Integer(MARGIN as i64),
            Object::Integer((PAGE_HEIGHT - MARGIN - TITLE_SIZE) as i64),
        ],
    ));
    ops.push(Operation::new("Tj", vec![pdf_string(text)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Draws one table row whose top edge is at `top`.
fn draw_row(ops: &mut Vec<Operation>, cells: &[String], widths: &[f64], top: f64, style: RowStyle) {
    let bottom = top - style.height;

    if let Some(fill) = style.fill {
        ops.push(fill_colour(fill));
        ops.push(rect(MARGIN, bottom, TABLE_WIDTH, style.height));
        ops.push(Operation::new("f", vec![]));
    }

    let font = if style.bold { FONT_BOLD } else { FONT_REGULAR };
    let baseline = bottom + (style.height - style.size) / 2.0 + style.size * 0.22;

    ops.push(fill_colour(style.text));
    let mut x = MARGIN;
    for (text, width) in cells.iter().zip(widths) {
        let text = fit_text(text, width - 2.0 * CELL_PADDING, style.size, style.bold);
        if !text.is_empty() {
            let text_x = x + (width - text_width(&text, style.size, style.bold)) / 2.0;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new(
                "Tf",
                vec![font.into(), Object::Integer(style.size as i64)],
            ));
            ops.push(Operation::new(
                "Td",
                vec![
                    Object::Integer(text_x.round() as i64),
                    Object::Integer(baseline.round() as i64),
                ],
            ));
            ops.push(Operation::new("Tj", vec![pdf_string(&text)]));
            ops.push(Operation::new("ET", vec![]));
        }
        x += width;
    }

    // 1pt black grid
    ops.push(stroke_colour(BLACK));
    ops.push(Operation::new("w", vec![Object::Integer(1)]));
    let mut x = MARGIN;
    for width in widths {
        ops.push(rect(x, bottom, *width, style.height));
        x += width;
    }
    ops.push(Operation::new("S", vec![]));
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Operation {
    Operation::new(
        "re",
        vec![
            Object::Integer(x.round() as i64),
            Object::Integer(y.round() as i64),
            Object::Integer(width.round() as i64),
            Object::Integer(height.round() as i64),
        ],
    )
}

fn fill_colour(colour: Rgb) -> Operation {
    Operation::new("rg", colour_operands(colour))
}

fn stroke_colour(colour: Rgb) -> Operation {
    Operation::new("RG", colour_operands(colour))
}

fn colour_operands(colour: Rgb) -> Vec<Object> {
    colour.to_unit().into_iter().map(Object::Real).collect()
}

// =============================================================================
// Text Encoding and Metrics
// =============================================================================

/// Encodes text for a WinAnsi Type1 font.
///
/// Latin-1 characters map to their own byte; anything else becomes `?`.
fn pdf_string(text: &str) -> Object {
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// Approximate rendered width of `text` in points.
///
/// Exact for ASCII in regular Helvetica; bold and accented letters use a
/// close estimate, which is enough to centre and clip cells.
fn text_width(text: &str, size: f64, bold: bool) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7E => u32::from(HELVETICA_WIDTHS[(code - 0x20) as usize]),
            _ => 556,
        })
        .sum();
    let scale = if bold { 1.06 } else { 1.0 };
    f64::from(units) * size / 1000.0 * scale
}

/// Clips text with an ellipsis so it fits in `max_width`.
fn fit_text(text: &str, max_width: f64, size: f64, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }

    let ellipsis = "...";
    let budget = max_width - text_width(ellipsis, size, bold);
    let mut clipped = String::new();
    for c in text.chars() {
        let mut candidate = clipped.clone();
        candidate.push(c);
        if text_width(&candidate, size, bold) > budget {
            break;
        }
        clipped = candidate;
    }
    clipped.push_str(ellipsis);
    clipped
}

// =============================================================================
// Unit Tests
// =============================================================================
