//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (登录/刷新/登出)
//! - [`reservations`] - 预订接口 (公共创建/可用性 + 管理端)
//! - [`notifications`] - 管理端通知接口
//! - [`locations`] - 门店管理接口
//! - [`tables`] - 桌台管理接口
//! - [`menu`] - 菜单接口 (公共读 + 管理端)
//! - [`admins`] - 管理员账号接口
//! - [`reports`] - 日报表接口

pub mod admins;
pub mod auth;
pub mod health;
pub mod locations;
pub mod menu;
pub mod notifications;
pub mod reports;
pub mod reservations;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ok, ok_list, ok_with_message};
