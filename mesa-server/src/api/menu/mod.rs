//! Menu API 模块
//!
//! 公共读 (网站菜单页)；写操作要求 menu:manage。

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new()
        .route("/api/menu/categories", get(handler::list_categories))
        .route("/api/menu/items", get(handler::list_items));

    let manage_routes = Router::new()
        .route("/api/menu/categories", post(handler::create_category))
        .route(
            "/api/menu/categories/{id}",
            axum::routing::put(handler::update_category).delete(handler::delete_category),
        )
        .route("/api/menu/items", post(handler::create_item))
        .route(
            "/api/menu/items/{id}",
            axum::routing::put(handler::update_item).delete(handler::delete_item),
        )
        .layer(middleware::from_fn(require_permission("menu:manage")));

    public_routes.merge(manage_routes)
}
