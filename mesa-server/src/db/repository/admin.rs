//! Admin Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Admin, AdminCreate, AdminUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "admin";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Admin>> {
        let admins: Vec<Admin> = self
            .base
            .db()
            .query("SELECT * FROM admin ORDER BY username")
            .await?
            .take(0)?;
        Ok(admins)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Admin>> {
        let thing = parse_record_id(id, "admin")?;
        let admin: Option<Admin> = self.base.db().select(thing).await?;
        Ok(admin)
    }

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin WHERE username = $username LIMIT 1")
            .bind(("username", username.to_string()))
            .await?;
        let admins: Vec<Admin> = result.take(0)?;
        Ok(admins.into_iter().next())
    }

    /// Active admins whose scope covers the given location
    ///
    /// 广播通知的受众：locations 为空 (不限门店) 或包含该门店。
    ///
    /// Reference fields are stored as "table:id" strings, so the
    /// comparison binds a string, not a record value.
    pub async fn find_scoped_to_location(&self, location: &RecordId) -> RepoResult<Vec<Admin>> {
        let admins: Vec<Admin> = self
            .base
            .db()
            .query(
                "SELECT * FROM admin WHERE is_active = true \
                 AND (array::len(locations) = 0 OR locations CONTAINS $location)",
            )
            .bind(("location", location.to_string()))
            .await?
            .take(0)?;
        Ok(admins)
    }

    /// Create an admin account
    ///
    /// 显式 `CREATE ... SET`：`hash_pass` 带 skip_serializing，
    /// 走 `.content()` 会把它丢掉。
    pub async fn create(&self, data: AdminCreate) -> RepoResult<Admin> {
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Admin '{}' already exists",
                data.username
            )));
        }

        let hash_pass = Admin::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());
        let locations: Vec<String> = data.locations.iter().map(|l| l.to_string()).collect();

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE admin SET
                    username = $username,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    locations = $locations,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("display_name", display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("locations", locations))
            .await?;

        let created: Option<Admin> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin".to_string()))
    }

    pub async fn update(&self, id: &str, data: AdminUpdate) -> RepoResult<Admin> {
        let thing = parse_record_id(id, "admin")?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Admin {} not found", id)))?;

        // Password changes re-hash; everything else is field replacement
        let hash_pass = match data.password {
            Some(password) => Admin::hash_password(&password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            None => existing.hash_pass,
        };

        let locations: Vec<String> = match data.locations {
            Some(raw) => raw
                .iter()
                .map(|l| parse_record_id(l, "location").map(|r| r.to_string()))
                .collect::<RepoResult<Vec<_>>>()?,
            None => existing.locations.iter().map(|l| l.to_string()).collect(),
        };

        let display_name = data.display_name.unwrap_or(existing.display_name);
        let role = data.role.unwrap_or(existing.role);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query(
                "UPDATE $thing SET hash_pass = $hash_pass, display_name = $display_name, \
                 role = $role, locations = $locations, is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("hash_pass", hash_pass))
            .bind(("display_name", display_name))
            .bind(("role", role))
            .bind(("locations", locations))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Admin {} not found", id)))
    }

    /// Hard delete an admin account
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, "admin")?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
