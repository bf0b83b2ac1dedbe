//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use shared::ApiResponse;
use surrealdb::RecordId;

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::db::repository::DiningTableRepository;
use crate::utils::{AppError, AppResult, ok, ok_list};

#[derive(Debug, Deserialize)]
pub struct TableListQuery {
    pub location: String,
}

/// GET /api/tables?location=... - 某门店的桌台
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TableListQuery>,
) -> AppResult<Json<ApiResponse<Vec<DiningTable>>>> {
    let location: RecordId = query
        .location
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid location ID: {}", query.location)))?;
    let tables = DiningTableRepository::new(state.get_db())
        .find_by_location(&location)
        .await?;
    Ok(ok_list(tables))
}

/// GET /api/tables/:id - 单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    let table = DiningTableRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(ok(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<impl IntoResponse> {
    if payload.number.trim().is_empty() {
        return Err(AppError::validation("number must not be empty".to_string()));
    }
    if payload.seats.is_some_and(|s| s < 1) {
        return Err(AppError::validation("seats must be at least 1".to_string()));
    }

    let table = DiningTableRepository::new(state.get_db()).create(payload).await?;
    Ok((StatusCode::CREATED, ok(table)))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<ApiResponse<DiningTable>>> {
    if payload.seats.is_some_and(|s| s < 1) {
        return Err(AppError::validation("seats must be at least 1".to_string()));
    }
    let table = DiningTableRepository::new(state.get_db())
        .update(&id, payload)
        .await?;
    Ok(ok(table))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let repo = DiningTableRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    let deleted = repo.delete(&id).await?;
    Ok(ok(deleted))
}
