//! Notification Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::NotificationType;
use surrealdb::RecordId;

/// In-app notification for admins
///
/// 由预订生命周期管理器作为副作用创建；
/// 之后只允许翻转已读状态，不做其他修改。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub reservation: Option<RecordId>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<RecordId>,
    /// None = broadcast to every admin scoped to `location`
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub recipient: Option<RecordId>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub read_by: Option<RecordId>,
    pub created_at: DateTime<Utc>,
}

/// Draft handed to the dispatcher by the lifecycle manager
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub reservation: Option<RecordId>,
    pub location: Option<RecordId>,
    /// None = broadcast
    pub recipient: Option<RecordId>,
}
