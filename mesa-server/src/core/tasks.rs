//! Background tasks

use crate::db::repository::RefreshTokenRepository;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Purge interval for expired refresh tokens
const PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Hourly sweep standing in for a storage-level TTL index
pub fn spawn_refresh_token_purge(db: Surreal<Db>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let repo = RefreshTokenRepository::new(db);
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Refresh token purge task stopped");
                    break;
                }
                _ = interval.tick() => {
                    match repo.purge_expired().await {
                        Ok(0) => {}
                        Ok(n) => tracing::info!("Purged {} expired refresh tokens", n),
                        Err(e) => tracing::warn!(error = %e, "Refresh token purge failed"),
                    }
                }
            }
        }
    })
}
