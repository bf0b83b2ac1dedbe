//! Reservation API 模块
//!
//! 公共面：创建预订、查询可用性。
//! 管理面：列表/详情 (reservations:read)，修改/状态迁移/删除
//! (reservations:manage)。

mod handler;

use axum::{Router, middleware, routing::get, routing::patch, routing::post};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    // 公共路由 (认证中间件放行)
    let public_routes = Router::new()
        .route("/api/reservations", post(handler::create))
        .route(
            "/api/reservations/availability/{location_id}",
            get(handler::availability),
        );

    let read_routes = Router::new()
        .route("/api/reservations", get(handler::list))
        .route("/api/reservations/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("reservations:read")));

    let manage_routes = Router::new()
        .route(
            "/api/reservations/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/api/reservations/{id}/status", patch(handler::update_status))
        .layer(middleware::from_fn(require_permission("reservations:manage")));

    public_routes.merge(read_routes).merge(manage_routes)
}
