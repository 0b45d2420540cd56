//! tallyd: the tally report server.
//!
//! Loads configuration, connects to MongoDB, and serves the report API.
//!
//! ## Configuration
//! - TALLY__SERVER__HOST / TALLY__SERVER__PORT: bind address (default 0.0.0.0:3000)
//! - TALLY__STORAGE__MONGODB__URI: connection string (default mongodb://localhost:27017)
//! - TALLY__STORAGE__MONGODB__DATABASE: database name (default tally)
//! - TALLY_LOG: tracing filter (default: info)

use tracing::{error, info};

use tally::config::Config;
use tally::http::{self, AppState};
use tally::storage;
use tally::utils::bootstrap::{init_tracing, parse_config_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("failed to load configuration: {}", e);
        e
    })?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        "starting tallyd"
    );

    let database = storage::connect(&config.storage.mongodb).await?;
    let state = AppState::new(&database);

    http::serve(state, &config.server.host, config.server.port).await?;

    Ok(())
}
