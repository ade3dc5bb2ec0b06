//! # Product Routes
//!
//! ```text
//! GET    /productos          ──► ProductRepository::list
//! POST   /api/productos      ──► ProductRepository::insert
//! DELETE /api/productos/{id} ──► ProductRepository::delete  (restricted)
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inventix_core::{NewProduct, Product};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::routes::{path_id, required, Envelope, Scalar};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub nombre: Option<Scalar>,
    #[serde(default)]
    pub descripcion: Option<Scalar>,
    #[serde(default)]
    pub precio: Option<Scalar>,
    #[serde(default)]
    pub stock: Option<Scalar>,
    #[serde(default)]
    pub proveedor: Option<Scalar>,
}

impl ProductPayload {
    /// Parses the numeric fields; text fields are normalized by validation.
    fn to_new_product(&self) -> Result<NewProduct, ApiError> {
        Ok(NewProduct {
            name: self.nombre.as_ref().map(Scalar::text).unwrap_or_default(),
            description: self.descripcion.as_ref().map(Scalar::text),
            price: required("precio", &self.precio)?.money("precio")?,
            stock: required("stock", &self.stock)?.integer("stock")?,
            supplier: self.proveedor.as_ref().map(Scalar::text),
        })
    }
}

/// `GET /productos`
pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Product>>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(Envelope::ok("OK", products)))
}

/// `POST /api/productos`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Envelope<Product>>, ApiError> {
    let Json(payload) = payload?;
    let input = payload.to_new_product()?;
    let product = state.db.products().insert(&input).await?;

    info!(product_id = product.id, "Product registered");
    Ok(Json(Envelope::ok("Producto registrado correctamente", product)))
}

/// `DELETE /api/productos/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = path_id(&raw_id)?;
    let removed = state
        .db
        .products()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Product", id))?;

    info!(product_id = id, removed, "Product delete");
    Ok(Json(Envelope::done("Producto eliminado")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ProductPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_string_and_number_fields() {
        let input = payload(r#"{"nombre":"Martillo","precio":"12.50","stock":"4"}"#)
            .to_new_product()
            .unwrap();
        assert_eq!(input.price.cents(), 1250);
        assert_eq!(input.stock, 4);
        assert_eq!(input.description, None);

        let input = payload(r#"{"nombre":"Clavos","precio":3,"stock":100,"proveedor":"ACME"}"#)
            .to_new_product()
            .unwrap();
        assert_eq!(input.price.cents(), 300);
        assert_eq!(input.supplier.as_deref(), Some("ACME"));
    }

    #[test]
    fn test_missing_price_is_reported() {
        let err = payload(r#"{"nombre":"Martillo","stock":1}"#)
            .to_new_product()
            .unwrap_err();
        assert_eq!(err.message, "precio is required");
    }
}
