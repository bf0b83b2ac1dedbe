//! Admin Account API Handlers
//!
//! `hash_pass` 带 `#[serde(skip_serializing)]`，响应里永远不会出现。

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use shared::ApiResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Admin, AdminCreate, AdminUpdate};
use crate::db::repository::AdminRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ok, ok_list};

/// GET /api/admins - 管理员列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Admin>>>> {
    let admins = AdminRepository::new(state.get_db()).find_all().await?;
    Ok(ok_list(admins))
}

/// GET /api/admins/:id - 管理员详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Admin>>> {
    let admin = AdminRepository::new(state.get_db())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Admin {} not found", id)))?;
    Ok(ok(admin))
}

/// POST /api/admins - 创建管理员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AdminCreate>,
) -> AppResult<impl IntoResponse> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    if payload.password.len() < 8 {
        return Err(AppError::validation(
            "password must be at least 8 characters".to_string(),
        ));
    }

    let admin = AdminRepository::new(state.get_db()).create(payload).await?;
    Ok((StatusCode::CREATED, ok(admin)))
}

/// PUT /api/admins/:id - 更新管理员
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AdminUpdate>,
) -> AppResult<Json<ApiResponse<Admin>>> {
    if let Some(password) = &payload.password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
        if password.len() < 8 {
            return Err(AppError::validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
    }
    let admin = AdminRepository::new(state.get_db()).update(&id, payload).await?;
    Ok(ok(admin))
}

/// DELETE /api/admins/:id - 删除管理员 (不能删除自己)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    if user.id == id {
        return Err(AppError::business_rule(
            "You cannot delete your own account".to_string(),
        ));
    }
    let repo = AdminRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Admin {} not found", id)))?;
    let deleted = repo.delete(&id).await?;
    Ok(ok(deleted))
}
