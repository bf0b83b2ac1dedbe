//! Admin Account API 模块
//!
//! 仅 admin 角色可用 (admins:manage 只由 "all" 覆盖)。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/admins",
            get(handler::list).post(handler::create),
        )
        .route(
            "/api/admins/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_permission("admins:manage")))
}
