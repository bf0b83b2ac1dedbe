//! Notification Dispatcher
//!
//! 预订创建/状态变更后的通知扇出：
//!
//! 1. 无条件持久化应用内通知记录 (落库失败只记日志)
//! 2. 解析受众：指定收件人，或广播给范围覆盖该门店的活跃管理员
//! 3. 异步推送扇出，失败从不回传给触发它的预订操作

use crate::db::models::{Notification, NotificationDraft};
use crate::db::repository::{AdminRepository, NotificationRepository};
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::warn;

use super::push::PushGateway;

pub struct NotificationDispatcher {
    db: Surreal<Db>,
    gateway: Arc<dyn PushGateway>,
}

impl NotificationDispatcher {
    pub fn new(db: Surreal<Db>, gateway: Arc<dyn PushGateway>) -> Self {
        Self { db, gateway }
    }

    /// Persist the notification and fan out push delivery
    ///
    /// Fire-and-forget by contract: every failure path is logged and
    /// swallowed, so a reservation operation never fails on its
    /// notification side effect.
    pub async fn dispatch(&self, draft: NotificationDraft) {
        let notification = Notification {
            id: None,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            reservation: draft.reservation,
            location: draft.location.clone(),
            recipient: draft.recipient.clone(),
            is_read: false,
            read_at: None,
            read_by: None,
            created_at: Utc::now(),
        };

        let repo = NotificationRepository::new(self.db.clone());
        let persisted = match repo.create(notification).await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Failed to persist notification");
                return;
            }
        };

        // Resolve the push audience
        let recipients: Vec<String> = match (&draft.recipient, &draft.location) {
            (Some(admin), _) => vec![admin.to_string()],
            (None, Some(location)) => {
                let admins = AdminRepository::new(self.db.clone());
                match admins.find_scoped_to_location(location).await {
                    Ok(list) => list
                        .into_iter()
                        .filter_map(|a| a.id.map(|id| id.to_string()))
                        .collect(),
                    Err(e) => {
                        warn!(error = %e, "Failed to resolve notification audience");
                        return;
                    }
                }
            }
            // Broadcast without a location: nobody to push to, the in-app
            // record is still visible to unscoped admins
            (None, None) => Vec::new(),
        };

        if recipients.is_empty() {
            return;
        }

        // Push fan-out runs detached from the request
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let deliveries = recipients
                .iter()
                .map(|recipient| gateway.push_to(recipient, &persisted));
            for (recipient, result) in recipients.iter().zip(join_all(deliveries).await) {
                if let Err(e) = result {
                    warn!(recipient = %recipient, error = %e, "Push delivery failed");
                }
            }
        });
    }
}
