//! HTTP endpoint layer.
//!
//! Maps method + path to a report, runs the normalizer and the report, and
//! serializes success/error envelopes. The router is built separately from
//! [`serve`] so it can be exercised in tests without binding a socket.

mod bank;
mod employees;
mod trips;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, put};
use axum::Router;
use mongodb::Database;
use serde::Serialize;
use tokio::signal::ctrl_c;
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::reports::{BankReports, EmployeeReports, TripReports};

/// Shared per-process state: one report set per dataset, all built from the
/// single database handle constructed at startup.
pub struct AppState {
    pub employees: EmployeeReports,
    pub bank: BankReports,
    pub trips: TripReports,
}

impl AppState {
    pub fn new(database: &Database) -> Arc<Self> {
        Arc::new(Self {
            employees: EmployeeReports::new(database),
            bank: BankReports::new(database),
            trips: TripReports::new(database),
        })
    }
}

/// Envelope for list-shaped report responses.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> Listing<T> {
    pub fn of(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Build the axum router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/employees/salaries_by_dept", get(employees::salaries_by_dept))
        .route("/active_clients", get(bank::active_clients))
        .route("/clients_by_product", get(bank::clients_by_product))
        .route("/top_accounts", get(bank::top_accounts))
        .route("/top_by_mount", get(bank::top_by_mount))
        .route("/change_datatype", put(bank::change_datatype))
        .route("/trips/user_distribution", get(trips::user_distribution))
        .route("/trips/trips_by_hour", get(trips::trips_by_hour))
        .route("/trips/trips_by_day", get(trips::trips_by_day))
        .route("/trips/top_station", get(trips::top_station))
        .route("/trips/peak_hours", get(trips::peak_hours))
        .route("/", get(employees::list).post(employees::create))
        .route("/:id", put(employees::update).delete(employees::delete))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(
    state: Arc<AppState>,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "report API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        ctrl_c().await.expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_counts_data() {
        let listing = Listing::of(vec![1, 2, 3]);
        assert!(listing.success);
        assert_eq!(listing.count, 3);
    }

    #[test]
    fn test_empty_listing_is_still_success() {
        let listing: Listing<i32> = Listing::of(vec![]);
        assert!(listing.success);
        assert_eq!(listing.count, 0);
    }
}
