//! Admin Account Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::AdminRole;
use surrealdb::RecordId;

/// Admin ID type
pub type AdminId = RecordId;

/// Admin account
///
/// `hash_pass` 永不序列化到响应；每次密码变更重新哈希。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<AdminId>,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub role: AdminRole,
    /// Location scope; empty = all locations
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub locations: Vec<RecordId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    pub role: AdminRole,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub locations: Vec<RecordId>,
}

/// Update admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Admin {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.hash_pass)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// Whether this admin may act on the given location
    ///
    /// 空 `locations` 表示不限门店。
    pub fn can_access_location(&self, location: &RecordId) -> bool {
        self.locations.is_empty() || self.locations.contains(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = Admin::hash_password("s3cret!").unwrap();
        let admin = Admin {
            id: None,
            username: "chef".into(),
            display_name: "Chef".into(),
            hash_pass: hash,
            role: AdminRole::Manager,
            locations: vec![],
            is_active: true,
        };
        assert!(admin.verify_password("s3cret!").unwrap());
        assert!(!admin.verify_password("wrong").unwrap());
    }

    #[test]
    fn empty_scope_means_all_locations() {
        let loc: RecordId = "location:down_town".parse().unwrap();
        let mut admin = Admin {
            id: None,
            username: "a".into(),
            display_name: "A".into(),
            hash_pass: String::new(),
            role: AdminRole::Staff,
            locations: vec![],
            is_active: true,
        };
        assert!(admin.can_access_location(&loc));

        admin.locations = vec!["location:uptown".parse().unwrap()];
        assert!(!admin.can_access_location(&loc));

        admin.locations.push(loc.clone());
        assert!(admin.can_access_location(&loc));
    }
}
