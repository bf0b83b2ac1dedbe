//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::TableZone;
use surrealdb::RecordId;

/// Dining table entity (桌台)
///
/// Invariant: `(location, number)` 唯一，由数据库唯一索引保证。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Owning location reference
    #[serde(with = "serde_helpers::record_id")]
    pub location: RecordId,
    /// Table number, unique within the location
    pub number: String,
    #[serde(default)]
    pub seats: i32,
    pub zone: TableZone,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    #[serde(with = "serde_helpers::record_id")]
    pub location: RecordId,
    pub number: String,
    pub seats: Option<i32>,
    pub zone: TableZone,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seats: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<TableZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
