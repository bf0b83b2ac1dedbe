//! Notification Repository
//!
//! 通知只在两处变化：创建、翻转已读。其余字段落库后不再修改。

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Admin, Notification};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "notification";

/// Visibility filter shared by list / unread-count / read-all
///
/// 可见 = 指定给本人，或 (广播 且 门店在本人范围内)。
/// locations 为空的管理员可见全部广播。
const VISIBLE_COND: &str = "(recipient = $admin OR (recipient = NONE AND \
    ($unscoped = true OR location = NONE OR location IN $locations)))";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, notification: Notification) -> RepoResult<Notification> {
        let created: Option<Notification> =
            self.base.db().create(TABLE).content(notification).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create notification".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Notification>> {
        let thing = parse_record_id(id, "notification")?;
        let notification: Option<Notification> = self.base.db().select(thing).await?;
        Ok(notification)
    }

    /// Notifications visible to the given admin, newest first
    pub async fn find_visible(&self, admin: &Admin) -> RepoResult<Vec<Notification>> {
        let sql = format!(
            "SELECT * FROM notification WHERE {} ORDER BY created_at DESC LIMIT 200",
            VISIBLE_COND
        );
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query(sql)
            .bind(("admin", admin_id_string(admin)?))
            .bind(("unscoped", admin.locations.is_empty()))
            .bind((
                "locations",
                admin
                    .locations
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>(),
            ))
            .await?
            .take(0)?;
        Ok(notifications)
    }

    /// Count unread notifications visible to the given admin
    pub async fn count_unread(&self, admin: &Admin) -> RepoResult<usize> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: i64,
        }

        let sql = format!(
            "SELECT count() AS count FROM notification WHERE is_read = false AND {} GROUP ALL",
            VISIBLE_COND
        );
        let row: Option<CountRow> = self
            .base
            .db()
            .query(sql)
            .bind(("admin", admin_id_string(admin)?))
            .bind(("unscoped", admin.locations.is_empty()))
            .bind((
                "locations",
                admin
                    .locations
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>(),
            ))
            .await?
            .take(0)?;
        Ok(row.map(|r| r.count.max(0) as usize).unwrap_or(0))
    }

    /// Flip a notification to read; idempotent
    ///
    /// 已读再标记保持首次 read_at / read_by 不变。
    pub async fn mark_read(&self, id: &str, admin: &Admin) -> RepoResult<Notification> {
        let thing = parse_record_id(id, "notification")?;
        self.base
            .db()
            .query(
                "UPDATE $thing SET is_read = true, read_at = $now, read_by = $admin \
                 WHERE is_read = false",
            )
            .bind(("thing", thing))
            .bind(("now", Utc::now()))
            .bind(("admin", admin_id_string(admin)?))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Notification {} not found", id)))
    }

    /// Mark every unread notification visible to the admin as read
    ///
    /// Returns the number of flipped notifications.
    pub async fn mark_all_read(&self, admin: &Admin) -> RepoResult<usize> {
        let unread = self.count_unread(admin).await?;
        let sql = format!(
            "UPDATE notification SET is_read = true, read_at = $now, read_by = $admin \
             WHERE is_read = false AND {}",
            VISIBLE_COND
        );
        self.base
            .db()
            .query(sql)
            .bind(("now", Utc::now()))
            .bind(("admin", admin_id_string(admin)?))
            .bind(("unscoped", admin.locations.is_empty()))
            .bind((
                "locations",
                admin
                    .locations
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>(),
            ))
            .await?;
        Ok(unread)
    }

    /// Hard delete a notification
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, "notification")?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}

fn admin_id_string(admin: &Admin) -> RepoResult<String> {
    admin
        .id
        .as_ref()
        .map(|id| id.to_string())
        .ok_or_else(|| RepoError::Validation("Admin record has no id".to_string()))
}
