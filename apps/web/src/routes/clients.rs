//! # Client Routes
//!
//! ```text
//! GET    /clientes          ──► ClientRepository::list      (by name)
//! POST   /api/clientes      ──► ClientRepository::insert    (validates)
//! DELETE /api/clientes/{id} ──► ClientRepository::delete    (restricted)
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use inventix_core::{Client, NewClient};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::routes::{path_id, text_or_empty, Envelope, Scalar};
use crate::state::AppState;

/// Registration form as posted by the browser.
///
/// Missing fields become empty strings and are rejected by validation
/// with the field's name.
#[derive(Debug, Deserialize)]
pub struct ClientPayload {
    #[serde(default)]
    pub nombre: Option<Scalar>,
    #[serde(default)]
    pub cedula: Option<Scalar>,
    #[serde(default)]
    pub celular: Option<Scalar>,
    #[serde(default)]
    pub email: Option<Scalar>,
    #[serde(default)]
    pub direccion: Option<Scalar>,
}

impl From<&ClientPayload> for NewClient {
    fn from(p: &ClientPayload) -> Self {
        NewClient {
            name: text_or_empty(&p.nombre),
            identification: text_or_empty(&p.cedula),
            phone: text_or_empty(&p.celular),
            email: text_or_empty(&p.email),
            address: text_or_empty(&p.direccion),
        }
    }
}

/// `GET /clientes`
pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Client>>>, ApiError> {
    let clients = state.db.clients().list().await?;
    Ok(Json(Envelope::ok("OK", clients)))
}

/// `POST /api/clientes`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<Json<Envelope<Client>>, ApiError> {
    let Json(payload) = payload?;
    let client = state.db.clients().insert(&NewClient::from(&payload)).await?;

    info!(client_id = client.id, "Client registered");
    Ok(Json(Envelope::ok("Cliente registrado correctamente", client)))
}

/// `DELETE /api/clientes/{id}`
///
/// Deleting an id that does not exist still succeeds.
pub async fn remove(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = path_id(&raw_id)?;
    let removed = state
        .db
        .clients()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_delete(e, "Client", id))?;

    info!(client_id = id, removed, "Client delete");
    Ok(Json(Envelope::done("Cliente eliminado")))
}
