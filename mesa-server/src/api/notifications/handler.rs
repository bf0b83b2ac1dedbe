//! Notification API Handlers
//!
//! 可见性 = 指定给本人，或广播且门店在本人范围内。
//! `mark_read` 幂等：重复标记保持首次 read_at。

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::ApiResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Admin, Notification};
use crate::db::repository::{AdminRepository, NotificationRepository};
use crate::utils::{AppError, AppResult, ok, ok_list, ok_with_message};

/// GET /api/notifications - 当前管理员可见的通知
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let admin = load_admin(&state, &user).await?;
    let notifications = NotificationRepository::new(state.get_db())
        .find_visible(&admin)
        .await?;
    Ok(ok_list(notifications))
}

#[derive(Serialize)]
pub struct UnreadCount {
    pub unread: usize,
}

/// GET /api/notifications/unread/count - 未读数量
pub async fn unread_count(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let admin = load_admin(&state, &user).await?;
    let unread = NotificationRepository::new(state.get_db())
        .count_unread(&admin)
        .await?;
    Ok(ok(UnreadCount { unread }))
}

/// PATCH /api/notifications/:id/read - 标记已读 (幂等)
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let admin = load_admin(&state, &user).await?;
    let notification = NotificationRepository::new(state.get_db())
        .mark_read(&id, &admin)
        .await?;
    Ok(ok(notification))
}

#[derive(Serialize)]
pub struct MarkedAll {
    pub marked: usize,
}

/// PATCH /api/notifications/read-all - 全部标记已读
pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<MarkedAll>>> {
    let admin = load_admin(&state, &user).await?;
    let marked = NotificationRepository::new(state.get_db())
        .mark_all_read(&admin)
        .await?;
    Ok(ok_with_message(
        MarkedAll { marked },
        format!("{} notifications marked as read", marked),
    ))
}

/// DELETE /api/notifications/:id - 删除通知
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let repo = NotificationRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Notification {} not found", id)))?;
    let deleted = repo.delete(&id).await?;
    Ok(ok(deleted))
}

/// Load the acting admin's full record (for the locations scope)
async fn load_admin(state: &ServerState, user: &CurrentUser) -> AppResult<Admin> {
    AdminRepository::new(state.get_db())
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::unauthorized())
}
