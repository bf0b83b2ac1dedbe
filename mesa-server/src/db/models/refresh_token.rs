//! Refresh Token Model
//!
//! 令牌明文只在签发响应里出现一次；库中仅存 SHA-256 摘要。

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Persisted refresh token record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// SHA-256 hex digest of the opaque token
    pub token_hash: String,
    #[serde(with = "serde_helpers::record_id")]
    pub admin: RecordId,
    pub expires_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// An expired-or-revoked token is never valid, regardless of any
    /// signature check elsewhere.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_in: i64, revoked: bool) -> RefreshToken {
        let now = Utc::now();
        RefreshToken {
            id: None,
            token_hash: "ab".repeat(32),
            admin: "admin:root".parse().unwrap(),
            expires_at: now + Duration::seconds(expires_in),
            revoked,
            revoked_at: None,
            ip_address: None,
            user_agent: None,
            created_at: now,
        }
    }

    #[test]
    fn expired_or_revoked_is_never_valid() {
        let now = Utc::now();
        assert!(token(60, false).is_valid(now));
        assert!(!token(-1, false).is_valid(now));
        assert!(!token(60, true).is_valid(now));
        assert!(!token(-1, true).is_valid(now));
    }
}
