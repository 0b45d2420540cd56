//! Trip analytics endpoints. These return bare row arrays, not the
//! `{success, count, data}` envelope.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::error::Result;
use crate::params;
use crate::reports::{
    DailyTripsRow, HourlyTripsRow, PeakHoursRow, StationRow, UserDistributionRow,
};

use super::AppState;

pub async fn user_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDistributionRow>>> {
    Ok(Json(state.trips.user_distribution().await?))
}

pub async fn trips_by_hour(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<Vec<HourlyTripsRow>>> {
    let hour = params::hour(raw.get("hour").map(String::as_str))?;
    Ok(Json(state.trips.trips_by_hour(hour).await?))
}

pub async fn trips_by_day(State(state): State<Arc<AppState>>) -> Result<Json<Vec<DailyTripsRow>>> {
    Ok(Json(state.trips.trips_by_day().await?))
}

pub async fn top_station(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<Vec<StationRow>>> {
    let limit = params::station_limit(raw.get("limit").map(String::as_str))?;
    Ok(Json(state.trips.top_stations(limit).await?))
}

pub async fn peak_hours(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<Vec<PeakHoursRow>>> {
    let hour = params::hour(raw.get("hour").map(String::as_str))?;
    let day_of_week = params::day_of_week(raw.get("dayOfWeek").map(String::as_str))?;
    Ok(Json(state.trips.peak_hours(hour, day_of_week).await?))
}
