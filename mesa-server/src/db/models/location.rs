//! Location Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Location ID type
pub type LocationId = RecordId;

/// Restaurant location entity (门店)
///
/// 正常流程从不硬删除；通过 `is_active` 软停用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<LocationId>,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Number of tables the venue holds
    #[serde(default)]
    pub total_tables: i32,
    /// Maximum number of guests across all zones
    #[serde(default)]
    pub max_capacity: i32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create location payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCreate {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub total_tables: Option<i32>,
    pub max_capacity: Option<i32>,
}

/// Update location payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tables: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
