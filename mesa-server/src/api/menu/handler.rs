//! Menu API Handlers
//!
//! 直接的字段映射 CRUD，没有业务规则。

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use shared::ApiResponse;

use crate::core::ServerState;
use crate::db::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemCreate, MenuItemUpdate,
};
use crate::db::repository::{MenuCategoryRepository, MenuItemRepository};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ok, ok_list};

/// GET /api/menu/categories - 菜单分类 (公共)
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<MenuCategory>>>> {
    let categories = MenuCategoryRepository::new(state.get_db()).find_active().await?;
    Ok(ok_list(categories))
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub category: Option<String>,
}

/// GET /api/menu/items?category=... - 菜品 (公共)
pub async fn list_items(
    State(state): State<ServerState>,
    Query(query): Query<ItemListQuery>,
) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = MenuItemRepository::new(state.get_db())
        .find_available(query.category.as_deref())
        .await?;
    Ok(ok_list(items))
}

/// POST /api/menu/categories - 创建分类
pub async fn create_category(
    State(state): State<ServerState>,
    Json(payload): Json<MenuCategoryCreate>,
) -> AppResult<impl IntoResponse> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let category = MenuCategoryRepository::new(state.get_db()).create(payload).await?;
    Ok((StatusCode::CREATED, ok(category)))
}

/// PUT /api/menu/categories/:id - 更新分类
pub async fn update_category(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuCategoryUpdate>,
) -> AppResult<Json<ApiResponse<MenuCategory>>> {
    let category = MenuCategoryRepository::new(state.get_db())
        .update(&id, payload)
        .await?;
    Ok(ok(category))
}

/// DELETE /api/menu/categories/:id - 删除分类
pub async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let repo = MenuCategoryRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu category {} not found", id)))?;
    let deleted = repo.delete(&id).await?;
    Ok(ok(deleted))
}

/// POST /api/menu/items - 创建菜品
pub async fn create_item(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<impl IntoResponse> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.price < 0 {
        return Err(AppError::validation("price must not be negative".to_string()));
    }
    // Category must exist
    MenuCategoryRepository::new(state.get_db())
        .find_by_id(&payload.category.to_string())
        .await?
        .ok_or_else(|| {
            AppError::validation(format!("Menu category {} not found", payload.category))
        })?;

    let item = MenuItemRepository::new(state.get_db()).create(payload).await?;
    Ok((StatusCode::CREATED, ok(item)))
}

/// PUT /api/menu/items/:id - 更新菜品
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<ApiResponse<MenuItem>>> {
    if payload.price.is_some_and(|p| p < 0) {
        return Err(AppError::validation("price must not be negative".to_string()));
    }
    let item = MenuItemRepository::new(state.get_db()).update(&id, payload).await?;
    Ok(ok(item))
}

/// DELETE /api/menu/items/:id - 删除菜品
pub async fn delete_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let repo = MenuItemRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {} not found", id)))?;
    let deleted = repo.delete(&id).await?;
    Ok(ok(deleted))
}
