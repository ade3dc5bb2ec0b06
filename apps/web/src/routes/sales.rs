//! # Sale Routes
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    POST /api/ventas                                     │
//! │                                                                         │
//! │  { cliente_id, numero_factura?, total?, items: [{ producto_id,         │
//! │    cantidad, precio?, subtotal? }] }                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SalePayload::to_new_sale   ids / amounts from numbers or strings      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleRepository::register   one transaction: invoice number, header,   │
//! │       │                     lines, stock                               │
//! │       ▼                                                                 │
//! │  { success: true, data: { sale: { invoice_number: "FAC-00001", … },    │
//! │                           items: [...] } }                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The invoice number and total in the response are the server's. Any
//! `numero_factura`, `total` or `subtotal` in the request is advisory.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Local;
use inventix_core::{Client, NewSale, NewSaleItem, Product, RecordedSale};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::routes::{required, Envelope, Scalar};
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SaleItemPayload {
    #[serde(default)]
    pub producto_id: Option<Scalar>,
    #[serde(default)]
    pub cantidad: Option<Scalar>,
    #[serde(default)]
    pub precio: Option<Scalar>,
    #[serde(default)]
    pub subtotal: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
pub struct SalePayload {
    #[serde(default)]
    pub numero_factura: Option<String>,
    #[serde(default)]
    pub cliente_id: Option<Scalar>,
    #[serde(default)]
    pub total: Option<Scalar>,
    #[serde(default)]
    pub items: Vec<SaleItemPayload>,
}

impl SaleItemPayload {
    fn to_new_item(&self) -> Result<NewSaleItem, ApiError> {
        Ok(NewSaleItem {
            product_id: required("producto_id", &self.producto_id)?.integer("producto_id")?,
            quantity: required("cantidad", &self.cantidad)?.integer("cantidad")?,
            unit_price: self
                .precio
                .as_ref()
                .map(|p| p.money("precio"))
                .transpose()?,
            declared_subtotal: self
                .subtotal
                .as_ref()
                .map(|s| s.money("subtotal"))
                .transpose()?,
        })
    }
}

impl SalePayload {
    fn to_new_sale(&self) -> Result<NewSale, ApiError> {
        Ok(NewSale {
            client_id: required("cliente_id", &self.cliente_id)?.integer("cliente_id")?,
            items: self
                .items
                .iter()
                .map(SaleItemPayload::to_new_item)
                .collect::<Result<_, _>>()?,
            declared_total: self
                .total
                .as_ref()
                .map(|t| t.money("total"))
                .transpose()?,
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Everything the sale form needs to render.
#[derive(Debug, Serialize)]
pub struct SaleForm {
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    /// Preview only; the number is assigned when the sale is registered.
    pub next_invoice_number: String,
}

/// `GET /ventas`
pub async fn form(State(state): State<AppState>) -> Result<Json<Envelope<SaleForm>>, ApiError> {
    let form = SaleForm {
        clients: state.db.clients().list().await?,
        products: state.db.products().list().await?,
        next_invoice_number: state.db.sales().next_invoice_preview().await?,
    };
    Ok(Json(Envelope::ok("OK", form)))
}

/// `POST /api/ventas`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<SalePayload>, JsonRejection>,
) -> Result<Json<Envelope<RecordedSale>>, ApiError> {
    let Json(payload) = payload?;
    let sale = payload.to_new_sale()?;

    let recorded = state
        .db
        .sales()
        .register(&sale, state.stock_policy(), Local::now().naive_local())
        .await?;

    if let Some(requested) = payload.numero_factura.as_deref() {
        if requested != recorded.sale.invoice_number {
            debug!(
                requested,
                assigned = %recorded.sale.invoice_number,
                "Client-side invoice number superseded"
            );
        }
    }

    info!(
        invoice = %recorded.sale.invoice_number,
        total_cents = recorded.sale.total_cents,
        lines = recorded.items.len(),
        "Sale registered"
    );
    Ok(Json(Envelope::ok("Venta registrada correctamente", recorded)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> SalePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_form_payload_with_strings() {
        let sale = payload(
            r#"{
                "numero_factura": "FAC-00001",
                "cliente_id": "1",
                "total": "40.00",
                "items": [
                    {"producto_id": "1", "cantidad": "2", "precio": "10.00", "subtotal": "20.00"},
                    {"producto_id": 2, "cantidad": 1}
                ]
            }"#,
        )
        .to_new_sale()
        .unwrap();

        assert_eq!(sale.client_id, 1);
        assert_eq!(sale.declared_total.map(|m| m.cents()), Some(4000));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].unit_price.map(|m| m.cents()), Some(1000));
        assert_eq!(sale.items[1].product_id, 2);
        assert_eq!(sale.items[1].unit_price, None);
    }

    #[test]
    fn test_missing_client_is_reported() {
        let err = payload(r#"{"items": []}"#).to_new_sale().unwrap_err();
        assert_eq!(err.message, "cliente_id is required");
    }

    #[test]
    fn test_bad_quantity_is_reported() {
        let err = payload(r#"{"cliente_id": 1, "items": [{"producto_id": 1, "cantidad": "dos"}]}"#)
            .to_new_sale()
            .unwrap_err();
        assert!(err.message.starts_with("cantidad"));
    }
}
