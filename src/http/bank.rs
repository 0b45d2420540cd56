//! Bank report endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::error::Result;
use crate::params::{self, ActiveClientsCriteria};
use crate::reports::{AccountVolumeRow, ActiveClientRow, ProductClientsRow, TypedVolumeRow};

use super::{AppState, Listing};

pub async fn active_clients(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<Listing<ActiveClientRow>>> {
    let criteria = ActiveClientsCriteria::from_query(
        raw.get("active").map(String::as_str),
        raw.get("limit").map(String::as_str),
    )?;
    Ok(Json(Listing::of(state.bank.active_clients(&criteria).await?)))
}

pub async fn clients_by_product(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Listing<ProductClientsRow>>> {
    Ok(Json(Listing::of(state.bank.clients_by_product().await?)))
}

pub async fn top_accounts(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<Listing<AccountVolumeRow>>> {
    let n = params::top_n(raw.get("n").map(String::as_str))?;
    Ok(Json(Listing::of(state.bank.top_accounts(n).await?)))
}

pub async fn top_by_mount(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<Listing<TypedVolumeRow>>> {
    let n = params::top_n(raw.get("n").map(String::as_str))?;
    Ok(Json(Listing::of(
        state.bank.top_by_transaction_type(n).await?,
    )))
}

#[derive(Debug, Serialize)]
pub struct RepairResponse {
    success: bool,
    message: &'static str,
    matched_count: u64,
    modified_count: u64,
}

pub async fn change_datatype(State(state): State<Arc<AppState>>) -> Result<Json<RepairResponse>> {
    let outcome = state.bank.repair_numeric_fields().await?;
    Ok(Json(RepairResponse {
        success: true,
        message: "transaction price/total coerced to numeric",
        matched_count: outcome.matched_count,
        modified_count: outcome.modified_count,
    }))
}
