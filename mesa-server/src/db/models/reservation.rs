//! Reservation Model
//!
//! 预订是系统的核心实体：嵌入客户信息与状态历史，
//! 对 Location / DiningTable / Admin 仅持非拥有引用。

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{ReservationStatus, ReservationType, TimeSlot};
use surrealdb::RecordId;
use validator::Validate;

/// Reservation ID type
pub type ReservationId = RecordId;

/// Embedded customer details
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    /// Required contact number
    #[validate(length(min = 5, max = 100))]
    pub phone: String,
    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One entry of the append-only status audit trail
///
/// `changed_by = None` 表示公共/系统操作者（无管理员身份）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ReservationStatus,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub changed_by: Option<RecordId>,
    pub changed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<ReservationId>,
    /// Owning location reference
    #[serde(with = "serde_helpers::record_id")]
    pub location: RecordId,
    /// Immutable after creation
    #[serde(rename = "type")]
    pub kind: ReservationType,
    /// Booked tables; may be empty for event / full_venue kinds
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub tables: Vec<RecordId>,
    pub customer: Customer,
    /// Calendar date of the visit (YYYY-MM-DD)
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_details: Option<String>,
    pub status: ReservationStatus,
    /// Append-only; length >= 1 after creation, last entry mirrors `status`
    pub status_history: Vec<StatusChange>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_by: Option<RecordId>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_by: Option<RecordId>,
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub confirmed_by: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Record ids of the booked tables, for conflict messages
    pub fn table_ids(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.to_string()).collect()
    }
}

/// Create reservation payload (public endpoint)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub location: RecordId,
    #[serde(rename = "type")]
    pub kind: ReservationType,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub tables: Vec<RecordId>,
    #[validate(nested)]
    pub customer: Customer,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    #[validate(range(min = 1))]
    pub guests: u32,
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_details: Option<String>,
}

/// Partial update payload (admin endpoint)
///
/// `type` 创建后不可变，因此不在此列。
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReservationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    /// Replaces the full table set when present
    #[serde(default)]
    pub tables: Option<Vec<String>>,
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[validate(nested)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_details: Option<String>,
}

/// Status transition request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// List filter (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}
