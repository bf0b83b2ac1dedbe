//! Notification API 模块 (管理端)

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::patch};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/api/notifications", get(handler::list))
        .route("/api/notifications/unread/count", get(handler::unread_count))
        .layer(middleware::from_fn(require_permission("notifications:read")));

    let manage_routes = Router::new()
        .route("/api/notifications/{id}/read", patch(handler::mark_read))
        .route("/api/notifications/read-all", patch(handler::mark_all_read))
        .route("/api/notifications/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission(
            "notifications:manage",
        )));

    read_routes.merge(manage_routes)
}
