//! Reservation API Handlers
//!
//! 薄 handler：提取/鉴权/解析，业务全部在 [`ReservationManager`]。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use shared::{ApiResponse, TimeSlot};
use surrealdb::RecordId;

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::db::models::{
    Reservation, ReservationCreate, ReservationFilter, ReservationUpdate, StatusUpdateRequest,
};
use crate::reservations::AvailabilityChecker;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult, ok, ok_list, ok_with_message};

/// POST /api/reservations - 创建预订 (公共)
///
/// 公共路由跳过了认证中间件；若请求仍带有效令牌 (管理员补录)，
/// 将其记为创建者。
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<impl IntoResponse> {
    let created_by = try_current_admin(&state, &headers);
    let reservation = state.reservation_manager().create(payload, created_by).await?;
    Ok((
        StatusCode::CREATED,
        ok_with_message(reservation, "Reservation created"),
    ))
}

/// Availability query string
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub start: String,
    pub end: String,
}

/// GET /api/reservations/availability/:location_id - 查询桌台可用性 (公共)
pub async fn availability(
    State(state): State<ServerState>,
    Path(location_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<crate::reservations::Availability>>> {
    let location: RecordId = location_id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid location ID: {}", location_id)))?;
    let date = parse_date(&query.date)?;
    let slot = TimeSlot::new(query.start, query.end);

    let availability = AvailabilityChecker::new(state.get_db())
        .check(&location, date, &slot, None)
        .await?;
    Ok(ok(availability))
}

/// GET /api/reservations - 预订列表 (管理端)
///
/// 支持 location / date / status 过滤；范围受限的管理员只能看到
/// 自己门店的预订。
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(filter): Query<ReservationFilter>,
) -> AppResult<Json<ApiResponse<Vec<Reservation>>>> {
    let reservations = state.reservation_manager().list(&filter).await?;
    let visible: Vec<Reservation> = reservations
        .into_iter()
        .filter(|r| user.can_access_location(&r.location))
        .collect();
    Ok(ok_list(visible))
}

/// GET /api/reservations/:id - 预订详情 (管理端)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let reservation = state.reservation_manager().get(&id).await?;
    require_location_scope(&user, &reservation)?;
    Ok(ok(reservation))
}

/// PUT /api/reservations/:id - 部分更新 (管理端)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let manager = state.reservation_manager();
    let current = manager.get(&id).await?;
    require_location_scope(&user, &current)?;

    let updated = manager.update(&id, payload, &user.record_id()?).await?;
    Ok(ok(updated))
}

/// PATCH /api/reservations/:id/status - 状态迁移 (管理端)
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let manager = state.reservation_manager();
    let current = manager.get(&id).await?;
    require_location_scope(&user, &current)?;

    let updated = manager
        .update_status(&id, payload, &user.record_id()?)
        .await?;
    Ok(ok(updated))
}

/// DELETE /api/reservations/:id - 硬删除 (管理端)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let manager = state.reservation_manager();
    let current = manager.get(&id).await?;
    require_location_scope(&user, &current)?;

    let deleted = manager.delete(&id).await?;
    Ok(ok(deleted))
}

/// Scoped admins may only touch reservations of their own locations
fn require_location_scope(user: &CurrentUser, reservation: &Reservation) -> AppResult<()> {
    if !user.can_access_location(&reservation.location) {
        return Err(AppError::forbidden(
            "Reservation belongs to a location outside your scope".to_string(),
        ));
    }
    Ok(())
}

/// Best-effort creator attribution on the public create endpoint
fn try_current_admin(state: &ServerState, headers: &HeaderMap) -> Option<RecordId> {
    let header = headers.get(http::header::AUTHORIZATION)?.to_str().ok()?;
    let token = JwtService::extract_from_header(header)?;
    let claims = state.get_jwt_service().validate_token(token).ok()?;
    claims.sub.parse().ok()
}
