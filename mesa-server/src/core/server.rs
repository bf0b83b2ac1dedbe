//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerState};
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::time::Duration;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::auth::router())
        .merge(crate::api::health::router())
        // Reservation core
        .merge(crate::api::reservations::router())
        .merge(crate::api::notifications::router())
        // Venue and menu management
        .merge(crate::api::locations::router())
        .merge(crate::api::tables::router())
        .merge(crate::api::menu::router())
        // Accounts and reporting
        .merge(crate::api::admins::router())
        .merge(crate::api::reports::router())
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for tests and embedding)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Create application state if not provided
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await,
        };

        // Start background tasks
        state.start_background_tasks();

        let app = build_app()
            // JWT 认证中间件 - require_auth 内部会跳过公共路由
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state.clone())
            // Tower HTTP 中间件
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_millis(
                self.config.request_timeout_ms,
            )))
            .layer(GlobalConcurrencyLimitLayer::new(self.config.max_connections))
            // HTTP 请求日志中间件
            .layer(middleware::from_fn(log_request));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Mesa server listening on {}", addr);

        // Graceful shutdown on ctrl-c: stop accepting, cancel background
        // tasks, drain in-flight requests up to the configured timeout
        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        let shutdown_state = state.clone();
        let drain = Duration::from_millis(self.config.shutdown_timeout_ms);
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            shutdown_state.trigger_shutdown();
            shutdown_handle.graceful_shutdown(Some(drain));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}
