//! # Report Downloads
//!
//! ```text
//! GET /api/reportes/ventas-excel      ──► Reporte_Ventas_YYYYMMDD.xlsx
//! GET /api/reportes/inventario-excel  ──► Reporte_Inventario_YYYYMMDD.xlsx
//! GET /api/reportes/ventas-pdf        ──► Reporte_Ventas_YYYYMMDD.pdf
//! GET /api/reportes/inventario-pdf    ──► Reporte_Inventario_YYYYMMDD.pdf
//! ```
//!
//! Rows are fetched on the async runtime; encoding runs on the blocking
//! pool since a long PDF is pure CPU work.

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use inventix_report::{ReportFormat, ReportKind, ReportTable};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::routes::Envelope;
use crate::state::AppState;

/// Every downloadable report, keyed by its URL slug.
const CATALOG: [(&str, ReportKind, ReportFormat); 4] = [
    ("ventas-excel", ReportKind::Sales, ReportFormat::Xlsx),
    ("inventario-excel", ReportKind::Inventory, ReportFormat::Xlsx),
    ("ventas-pdf", ReportKind::Sales, ReportFormat::Pdf),
    ("inventario-pdf", ReportKind::Inventory, ReportFormat::Pdf),
];

fn lookup(slug: &str) -> Option<(ReportKind, ReportFormat)> {
    CATALOG
        .iter()
        .find(|(s, _, _)| *s == slug)
        .map(|(_, kind, format)| (*kind, *format))
}

/// One entry of the report menu.
#[derive(Debug, Serialize)]
pub struct ReportLink {
    pub title: &'static str,
    pub format: &'static str,
    pub url: String,
}

/// `GET /reportes`
pub async fn index() -> Json<Envelope<Vec<ReportLink>>> {
    let links = CATALOG
        .iter()
        .map(|(slug, kind, format)| ReportLink {
            title: kind.title(),
            format: format.extension(),
            url: format!("/api/reportes/{slug}"),
        })
        .collect();
    Json(Envelope::ok("OK", links))
}

/// `GET /api/reportes/{report}`
pub async fn download(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let (kind, format) = lookup(&slug).ok_or_else(|| ApiError::not_found("Report", &slug))?;

    let table = match kind {
        ReportKind::Sales => ReportTable::sales(&state.db.sales().list_summaries().await?)?,
        ReportKind::Inventory => ReportTable::inventory(&state.db.products().list().await?),
    };
    let rows = table.rows.len();

    let bytes = tokio::task::spawn_blocking(move || inventix_report::render(&table, format))
        .await
        .map_err(|e| ApiError::internal(format!("Report task failed: {e}")))??;

    let file_name = kind.file_name(Local::now().date_naive(), format);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .map_err(|e| ApiError::internal(e.to_string()))?;

    info!(report = %file_name, rows, bytes = bytes.len(), "Report generated");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(format.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(
            lookup("ventas-pdf"),
            Some((ReportKind::Sales, ReportFormat::Pdf))
        );
        assert_eq!(
            lookup("inventario-excel"),
            Some((ReportKind::Inventory, ReportFormat::Xlsx))
        );
        assert_eq!(lookup("clientes-pdf"), None);
    }
}
