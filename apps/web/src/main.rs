//! `inventix` server binary.
//!
//! ```text
//! inventix                      # config from $INVENTIX_CONFIG or the platform dir
//! inventix /etc/inventix.toml   # explicit config file
//! ```

use std::path::PathBuf;

use inventix_web::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    inventix_web::init_tracing();

    info!("Starting Inventix");

    let config = AppConfig::load(std::env::args_os().nth(1).map(PathBuf::from))?;
    info!(
        addr = %config.server.bind_address(),
        db = %config.database.path.display(),
        "Configuration loaded"
    );

    inventix_web::serve(config).await?;
    Ok(())
}
