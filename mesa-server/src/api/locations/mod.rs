//! Location API 模块
//!
//! 列表是公共路由 (只返回营业中的门店)；其余是管理端。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let public_routes = Router::new().route("/api/locations", get(handler::list_active));

    let manage_routes = Router::new()
        .route("/api/locations/all", get(handler::list_all))
        .route("/api/locations", axum::routing::post(handler::create))
        .route(
            "/api/locations/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::deactivate),
        )
        .layer(middleware::from_fn(require_permission("locations:manage")));

    public_routes.merge(manage_routes)
}
