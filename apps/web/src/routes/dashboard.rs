//! Dashboard aggregates and the health probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use inventix_core::{DashboardStats, Money};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::routes::Envelope;
use crate::state::AppState;

/// Dashboard payload: the raw counters plus the total as a decimal string.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub stats: DashboardStats,

    /// `total_sold_cents` formatted as `1234.50`.
    pub total_sold: String,
}

/// `GET /`
pub async fn index(State(state): State<AppState>) -> Result<Json<Envelope<DashboardView>>, ApiError> {
    let stats = state.db.dashboard().stats().await?;
    debug!(?stats, "Dashboard loaded");

    let view = DashboardView {
        stats,
        total_sold: Money::from_cents(stats.total_sold_cents).to_decimal_string(),
    };
    Ok(Json(Envelope::ok("OK", view)))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: bool,
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    if state.db.health_check().await {
        (
            StatusCode::OK,
            Json(Health {
                status: "ok",
                database: true,
            }),
        )
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "degraded",
                database: false,
            }),
        )
    }
}
