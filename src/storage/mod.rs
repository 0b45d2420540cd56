//! MongoDB connection bootstrap and collection names.

use mongodb::bson::doc;
use mongodb::{Client, Database};
use tracing::info;

use crate::config::MongodbConfig;

/// Collection names.
pub const EMPLOYEES_COLLECTION: &str = "employees_salaries";
pub const CUSTOMERS_COLLECTION: &str = "customers";
pub const ACCOUNTS_COLLECTION: &str = "accounts";
pub const TRANSACTIONS_COLLECTION: &str = "transactions";
pub const TRIPS_COLLECTION: &str = "trips";

/// Connect to MongoDB and verify the server is reachable.
///
/// The handle is built once at startup and passed into each report
/// constructor; the driver owns pooling and per-request concurrency. An
/// unreachable server fails here rather than on the first request.
pub async fn connect(config: &MongodbConfig) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(&config.uri).await?;
    let database = client.database(&config.database);

    database.run_command(doc! { "ping": 1 }).await?;
    info!(database = %config.database, "connected to MongoDB");

    Ok(database)
}
