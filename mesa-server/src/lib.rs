//! Mesa Server - 餐厅预订与管理系统服务端
//!
//! # 架构概述
//!
//! 本模块是 Mesa Server 的主入口，提供以下核心功能：
//!
//! - **预订核心** (`reservations`): 可用性检查、生命周期状态机、审计历史
//! - **通知** (`notifications`): 应用内通知 + 推送扇出
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 + 刷新令牌轮换
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! mesa-server/src/
//! ├── core/            # 配置、状态、服务器
//! ├── auth/            # JWT 认证、权限、限流
//! ├── api/             # HTTP 路由和处理器
//! ├── db/              # 数据库层 (models + repositories)
//! ├── reservations/    # 预订核心 (可用性 + 生命周期)
//! ├── notifications/   # 通知扇出
//! └── utils/           # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod notifications;
pub mod reservations;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use notifications::NotificationDispatcher;
pub use reservations::{AvailabilityChecker, ReservationManager};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置进程环境 (dotenv + 日志)
///
/// 必须在读取 [`Config`] 之前调用。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___
   /  |/  /__  _________ _
  / /|_/ / _ \/ ___/ __ `/
 / /  / /  __(__  ) /_/ /
/_/  /_/\___/____/\__,_/
    "#
    );
}
