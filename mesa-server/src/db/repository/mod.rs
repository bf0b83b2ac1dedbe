//! Repository Module
//!
//! Provides CRUD operations over the embedded SurrealDB tables.

// Auth
pub mod admin;
pub mod refresh_token;

// Venue
pub mod dining_table;
pub mod location;

// Menu
pub mod menu;

// Reservations
pub mod reservation;

// Notifications
pub mod notification;

// Re-exports
pub use admin::AdminRepository;
pub use dining_table::DiningTableRepository;
pub use location::LocationRepository;
pub use menu::{MenuCategoryRepository, MenuItemRepository};
pub use notification::NotificationRepository;
pub use refresh_token::RefreshTokenRepository;
pub use reservation::ReservationRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Shared handle every repository wraps
///
/// Surreal 连接本身是廉价克隆的；仓库按请求构造。
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a "table:id" string into a RecordId with a uniform error
pub fn parse_record_id(id: &str, what: &str) -> RepoResult<surrealdb::RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid {} ID: {}", what, id)))
}
