//! 通知模块
//!
//! - [`NotificationDispatcher`] - 通知落库 + 推送扇出
//! - [`PushGateway`] - 推送投递接缝 (HTTP 中继 / no-op)

pub mod dispatcher;
pub mod push;

pub use dispatcher::NotificationDispatcher;
pub use push::{HttpPushGateway, NoopPushGateway, PushGateway};
