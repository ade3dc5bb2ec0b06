//! # Inventix Web
//!
//! HTTP front end for the inventory and sales application.
//!
//! ## Module Organization
//! ```text
//! inventix_web/
//! ├── lib.rs          ◄─── You are here (router, logging, serve)
//! ├── main.rs         ◄─── `inventix` binary
//! ├── config.rs       ◄─── Layered TOML + env configuration
//! ├── state.rs        ◄─── Shared handler state
//! ├── error.rs        ◄─── ApiError → 400 + JSON envelope
//! └── routes/
//!     ├── dashboard.rs
//!     ├── clients.rs
//!     ├── products.rs
//!     ├── sales.rs
//!     └── reports.rs
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use inventix_db::Database;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::ServeError;
use crate::state::AppState;

/// Builds the application router.
///
/// ## Routes
/// ```text
/// GET    /                          dashboard aggregates
/// GET    /health                    liveness + database probe
/// GET    /clientes                  clients by name
/// POST   /api/clientes              register client
/// DELETE /api/clientes/{id}         delete client
/// GET    /productos                 products by name
/// POST   /api/productos             register product
/// DELETE /api/productos/{id}        delete product
/// GET    /ventas                    sale form data
/// POST   /api/ventas                register sale
/// GET    /reportes                  report menu
/// GET    /api/reportes/{report}     download a report
/// ```
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard::index))
        .route("/health", get(routes::dashboard::health))
        .route("/clientes", get(routes::clients::list))
        .route("/api/clientes", post(routes::clients::create))
        .route("/api/clientes/{id}", delete(routes::clients::remove))
        .route("/productos", get(routes::products::list))
        .route("/api/productos", post(routes::products::create))
        .route("/api/productos/{id}", delete(routes::products::remove))
        .route("/ventas", get(routes::sales::form))
        .route("/api/ventas", post(routes::sales::create))
        .route("/reportes", get(routes::reports::index))
        .route("/api/reportes/{report}", get(routes::reports::download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connects the database and serves until Ctrl+C or SIGTERM.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Open SQLite pool (WAL, foreign keys) and run migrations            │
/// │  2. Bind the listener on server.bind_addr:server.port                  │
/// │  3. Serve; on shutdown signal drain in-flight requests                 │
/// │  4. Close the pool                                                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn serve(config: AppConfig) -> Result<(), ServeError> {
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    info!(path = %config.database.path.display(), "Database ready");

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        stock_policy = %config.sales.stock_policy,
        "Inventix listening"
    );

    let app = router(AppState::new(db.clone(), config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=inventix=trace` - Show trace for inventix crates only
/// - Default: `info,inventix=debug,tower_http=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventix=debug,tower_http=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
