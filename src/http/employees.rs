//! Employee endpoints: the salaries report plus plain CRUD.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::Result;
use crate::reports::{DeptSalaryRow, Employee, NewEmployee, UpdateEmployee};

use super::{AppState, Listing};

pub async fn salaries_by_dept(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeptSalaryRow>>> {
    Ok(Json(state.employees.salaries_by_dept().await?))
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Listing<Employee>>> {
    Ok(Json(Listing::of(state.employees.list().await?)))
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    success: bool,
    message: &'static str,
    data: Employee,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewEmployee>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let employee = state.employees.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            success: true,
            message: "employee created",
            data: employee,
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    success: bool,
    message: &'static str,
    #[serde(rename = "modifiedCount")]
    modified_count: u64,
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEmployee>,
) -> Result<Json<UpdatedResponse>> {
    let modified_count = state.employees.update(&id, payload).await?;
    Ok(Json(UpdatedResponse {
        success: true,
        message: "employee updated",
        modified_count,
    }))
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    success: bool,
    message: &'static str,
    #[serde(rename = "deletedCount")]
    deleted_count: u64,
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>> {
    let deleted_count = state.employees.delete(&id).await?;
    Ok(Json(DeletedResponse {
        success: true,
        message: "employee deleted",
        deleted_count,
    }))
}
