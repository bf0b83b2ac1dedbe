//! Push delivery gateway
//!
//! 实际的设备推送 (web-push 协议) 由外部推送中继完成；
//! 本层只决定**是否**推送和**推给谁**，并把失败记录到日志。
//! 应用内通知记录无论推送结果如何都已落库。

use crate::db::models::Notification;
use async_trait::async_trait;
use std::time::Duration;

/// Outbound push delivery seam
///
/// One call per recipient; implementations must never panic and report
/// failures through the Result only.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn push_to(&self, admin_id: &str, notification: &Notification) -> anyhow::Result<()>;
}

/// HTTP relay implementation
///
/// POSTs `{recipient, notification}` to the configured relay, which owns
/// device subscriptions and the actual web-push handshake.
pub struct HttpPushGateway {
    client: reqwest::Client,
    relay_url: String,
}

impl HttpPushGateway {
    pub fn new(relay_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, relay_url }
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn push_to(&self, admin_id: &str, notification: &Notification) -> anyhow::Result<()> {
        let payload = serde_json::json!({
            "recipient": admin_id,
            "notification": notification,
        });
        let response = self
            .client
            .post(&self.relay_url)
            .json(&payload)
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }
}

/// No-op gateway used when no relay is configured (and in tests)
pub struct NoopPushGateway;

#[async_trait]
impl PushGateway for NoopPushGateway {
    async fn push_to(&self, admin_id: &str, _notification: &Notification) -> anyhow::Result<()> {
        tracing::debug!(recipient = %admin_id, "Push relay not configured, skipping delivery");
        Ok(())
    }
}
