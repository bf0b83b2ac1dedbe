//! Database Module
//!
//! Embedded SurrealDB storage: connection, schema bootstrap and seed data.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use models::AdminCreate;
use shared::AdminRole;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "mesa";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database (RocksDB engine) and bootstrap the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::prepare(db).await
    }

    /// Open an in-memory database (tests and ephemeral dev runs)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        let service = Self { db };
        service.init_schema().await?;
        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);
        Ok(service)
    }

    /// Apply table and index definitions
    ///
    /// 唯一索引是防止重复数据的承重墙：
    /// - admin.username
    /// - location.name
    /// - (dining_table.location, dining_table.number)
    /// - refresh_token.token_hash
    async fn init_schema(&self) -> Result<(), AppError> {
        const SCHEMA: &str = "
            DEFINE TABLE IF NOT EXISTS location SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS uniq_location_name ON TABLE location COLUMNS name UNIQUE;

            DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS uniq_table_number ON TABLE dining_table COLUMNS location, number UNIQUE;

            DEFINE TABLE IF NOT EXISTS reservation SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS idx_reservation_day ON TABLE reservation COLUMNS location, date;

            DEFINE TABLE IF NOT EXISTS admin SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS uniq_admin_username ON TABLE admin COLUMNS username UNIQUE;

            DEFINE TABLE IF NOT EXISTS notification SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS refresh_token SCHEMALESS;
            DEFINE INDEX IF NOT EXISTS uniq_refresh_token ON TABLE refresh_token COLUMNS token_hash UNIQUE;

            DEFINE TABLE IF NOT EXISTS menu_category SCHEMALESS;
            DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
        ";

        self.db
            .query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {}", e)))?;
        Ok(())
    }

    /// Seed the default admin account if the admin table is empty
    ///
    /// 密码来自 ADMIN_INITIAL_PASSWORD；未设置时生成随机密码并打印到日志
    /// (仅首次启动出现一次)。
    pub async fn ensure_default_admin(&self) -> Result<(), AppError> {
        let mut result = self
            .db
            .query("SELECT count() AS count FROM admin GROUP ALL")
            .await
            .map_err(|e| AppError::database(format!("Failed to count admins: {}", e)))?;

        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let row: Option<CountRow> = result
            .take(0)
            .map_err(|e| AppError::database(format!("Failed to parse count: {}", e)))?;

        if row.map(|r| r.count).unwrap_or(0) > 0 {
            return Ok(());
        }

        let (password, generated) = match std::env::var("ADMIN_INITIAL_PASSWORD") {
            Ok(p) if !p.is_empty() => (p, false),
            _ => (uuid::Uuid::new_v4().simple().to_string(), true),
        };

        repository::AdminRepository::new(self.db.clone())
            .create(AdminCreate {
                username: "admin".to_string(),
                password: password.clone(),
                display_name: Some("Administrator".to_string()),
                role: AdminRole::Admin,
                locations: vec![],
            })
            .await
            .map_err(|e| AppError::database(format!("Failed to seed admin: {}", e)))?;

        if generated {
            tracing::warn!(
                "Seeded default admin 'admin' with generated password: {} (change it immediately)",
                password
            );
        } else {
            tracing::info!("Seeded default admin 'admin' from ADMIN_INITIAL_PASSWORD");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Admin;

    #[tokio::test]
    async fn on_disk_database_seeds_admin_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesa.db");
        let service = DbService::new(&path.to_string_lossy()).await.unwrap();

        service.ensure_default_admin().await.unwrap();
        // Second call must be a no-op
        service.ensure_default_admin().await.unwrap();

        let admins: Vec<Admin> = service
            .db
            .query("SELECT * FROM admin")
            .await
            .unwrap()
            .take(0)
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].username, "admin");
        assert_eq!(admins[0].role, AdminRole::Admin);
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicate_usernames() {
        let service = DbService::memory().await.unwrap();
        let repo = repository::AdminRepository::new(service.db.clone());
        let create = |name: &str| AdminCreate {
            username: name.to_string(),
            password: "longenough".to_string(),
            display_name: None,
            role: AdminRole::Staff,
            locations: vec![],
        };

        repo.create(create("hostess")).await.unwrap();
        assert!(repo.create(create("hostess")).await.is_err());
    }
}
