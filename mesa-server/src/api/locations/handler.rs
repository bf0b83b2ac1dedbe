//! Location API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::models::{Location, LocationCreate, LocationUpdate};
use crate::db::repository::LocationRepository;
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppResult, ok, ok_list, ok_with_message};

/// GET /api/locations - 营业中的门店 (公共)
pub async fn list_active(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Location>>>> {
    let locations = LocationRepository::new(state.get_db()).find_active().await?;
    Ok(ok_list(locations))
}

/// GET /api/locations/all - 全部门店，含停用 (管理端)
pub async fn list_all(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<Location>>>> {
    let locations = LocationRepository::new(state.get_db()).find_all().await?;
    Ok(ok_list(locations))
}

/// GET /api/locations/:id - 门店详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let location = LocationRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| crate::AppError::not_found(format!("Location {} not found", id)))?;
    Ok(ok(location))
}

/// POST /api/locations - 创建门店
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LocationCreate>,
) -> AppResult<impl IntoResponse> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.address, "address", MAX_ADDRESS_LEN)?;

    let location = LocationRepository::new(state.get_db()).create(payload).await?;
    Ok((StatusCode::CREATED, ok(location)))
}

/// PUT /api/locations/:id - 更新门店
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<LocationUpdate>,
) -> AppResult<Json<ApiResponse<Location>>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let location = LocationRepository::new(state.get_db())
        .update(&id, payload)
        .await?;
    Ok(ok(location))
}

/// DELETE /api/locations/:id - 软停用 (门店从不硬删除)
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let location = LocationRepository::new(state.get_db()).deactivate(&id).await?;
    Ok(ok_with_message(location, "Location deactivated"))
}
