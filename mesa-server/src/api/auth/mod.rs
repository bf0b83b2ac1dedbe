//! Auth API 模块
//!
//! login / refresh 是公共路由 (认证中间件放行)；
//! logout / me 要求有效访问令牌。

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/login", post(handler::login))
        .route("/api/auth/refresh", post(handler::refresh))
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/auth/me", get(handler::me))
}
