//! Refresh Token Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::RefreshToken;
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "refresh_token";

#[derive(Clone)]
pub struct RefreshTokenRepository {
    base: BaseRepository,
}

impl RefreshTokenRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, token: RefreshToken) -> RepoResult<RefreshToken> {
        let created: Option<RefreshToken> = self.base.db().create(TABLE).content(token).await?;
        created.ok_or_else(|| RepoError::Database("Failed to store refresh token".to_string()))
    }

    /// Look up by token digest
    pub async fn find_by_hash(&self, token_hash: &str) -> RepoResult<Option<RefreshToken>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM refresh_token WHERE token_hash = $hash LIMIT 1")
            .bind(("hash", token_hash.to_string()))
            .await?;
        let tokens: Vec<RefreshToken> = result.take(0)?;
        Ok(tokens.into_iter().next())
    }

    /// Revoke by token digest; revoking an unknown token is a no-op
    pub async fn revoke(&self, token_hash: &str) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "UPDATE refresh_token SET revoked = true, revoked_at = $now \
                 WHERE token_hash = $hash AND revoked = false",
            )
            .bind(("hash", token_hash.to_string()))
            .bind(("now", Utc::now()))
            .await?;
        Ok(())
    }

    /// Delete expired tokens; stands in for a storage-level TTL index
    ///
    /// Returns the number of purged documents.
    pub async fn purge_expired(&self) -> RepoResult<usize> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM refresh_token WHERE expires_at < $now GROUP ALL")
            .bind(("now", Utc::now()))
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        let expired = row.map(|r| r.count.max(0) as usize).unwrap_or(0);

        if expired > 0 {
            self.base
                .db()
                .query("DELETE refresh_token WHERE expires_at < $now")
                .bind(("now", Utc::now()))
                .await?;
        }
        Ok(expired)
    }
}
