//! Visit-event-to-channel routing.
//!
//! [`NotificationRouter`] turns "visit created" into a host notification and
//! "status changed" into a security notification, each on its configured
//! [`Channel`]. Delivery is best-effort: failures are logged and reported as
//! a [`DeliveryOutcome`], never as an error to the caller.

use std::sync::Arc;

use gatepass_db::models::visitor::Visitor;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::channel::{AppTarget, Channel, NotificationConfig};
use crate::delivery::webhook::WebhookDelivery;
use crate::message;
use crate::security_log::SecurityLog;

/// Path of the security ingestion endpoint on a security service.
pub const SECURITY_INGEST_PATH: &str = "/api/security/notifications";

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Host,
    Security,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Host => "host",
            Direction::Security => "security",
        }
    }
}

/// Result of one delivery attempt, for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The remote endpoint answered with a 2xx status.
    Sent { status: u16 },
    /// Appended to the in-process security log.
    Recorded,
    /// Nothing was sent because the channel has no URL configured.
    Skipped { reason: String },
    /// The attempt failed (network error, timeout, or non-2xx status).
    Failed { error: String },
}

/// Routes visit events to the host and security channels.
pub struct NotificationRouter {
    config: NotificationConfig,
    delivery: WebhookDelivery,
    security_log: Arc<SecurityLog>,
}

impl NotificationRouter {
    pub fn new(
        config: NotificationConfig,
        delivery: WebhookDelivery,
        security_log: Arc<SecurityLog>,
    ) -> Self {
        Self {
            config,
            delivery,
            security_log,
        }
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    /// Notify the host about a newly registered visit.
    ///
    /// Runs on a background task; the returned handle may be awaited or
    /// dropped.
    pub fn notify_host(self: &Arc<Self>, visitor: Visitor) -> JoinHandle<DeliveryOutcome> {
        let router = Arc::clone(self);
        tokio::spawn(async move { router.deliver_host(&visitor).await })
    }

    /// Notify security about a decided visit.
    ///
    /// A local `app` channel appends inline, so the log reflects the change
    /// before this returns; in that case `None` is returned. Every other
    /// channel is delivered on a background task.
    pub async fn notify_security(
        self: &Arc<Self>,
        visitor: Visitor,
    ) -> Option<JoinHandle<DeliveryOutcome>> {
        if matches!(
            self.config.security,
            Channel::App {
                target: AppTarget::Local
            }
        ) {
            self.deliver_security(&visitor).await;
            return None;
        }

        let router = Arc::clone(self);
        Some(tokio::spawn(async move {
            router.deliver_security(&visitor).await
        }))
    }

    /// Deliver the host notification and wait for the outcome.
    pub async fn deliver_host(&self, visitor: &Visitor) -> DeliveryOutcome {
        let channel = &self.config.host;
        let outcome = match channel {
            Channel::Wechat { url } | Channel::Dingtalk { url } => {
                let payload = message::chat_payload(&message::host_message(visitor));
                self.post_optional(url.as_deref(), &payload).await
            }
            Channel::Webhook { url } => {
                self.post(url, &message::host_webhook_payload(visitor)).await
            }
            // Not produced by config resolution for the host direction.
            Channel::App { .. } => DeliveryOutcome::Skipped {
                reason: "app channel is not available for host notifications".to_string(),
            },
        };
        log_outcome(Direction::Host, channel, visitor, &outcome);
        outcome
    }

    /// Deliver the security notification and wait for the outcome.
    pub async fn deliver_security(&self, visitor: &Visitor) -> DeliveryOutcome {
        let channel = &self.config.security;
        let outcome = match channel {
            Channel::Wechat { url } | Channel::Dingtalk { url } => {
                let payload = message::chat_payload(&message::security_message(visitor));
                self.post_optional(url.as_deref(), &payload).await
            }
            Channel::Webhook { url } => {
                self.post(url, &message::security_payload(visitor)).await
            }
            Channel::App {
                target: AppTarget::Local,
            } => {
                if let Value::Object(fields) = message::security_payload(visitor) {
                    self.security_log.append(fields).await;
                }
                DeliveryOutcome::Recorded
            }
            Channel::App {
                target: AppTarget::Remote { base_url },
            } => {
                let url = format!("{}{SECURITY_INGEST_PATH}", base_url.trim_end_matches('/'));
                self.post(&url, &message::security_payload(visitor)).await
            }
        };
        log_outcome(Direction::Security, channel, visitor, &outcome);
        outcome
    }

    async fn post_optional(&self, url: Option<&str>, payload: &Value) -> DeliveryOutcome {
        match url {
            Some(url) => self.post(url, payload).await,
            None => DeliveryOutcome::Skipped {
                reason: "webhook not configured".to_string(),
            },
        }
    }

    async fn post(&self, url: &str, payload: &Value) -> DeliveryOutcome {
        match self.delivery.post_json(url, payload).await {
            Ok(status) => DeliveryOutcome::Sent { status },
            Err(e) => DeliveryOutcome::Failed {
                error: e.to_string(),
            },
        }
    }
}

fn log_outcome(
    direction: Direction,
    channel: &Channel,
    visitor: &Visitor,
    outcome: &DeliveryOutcome,
) {
    let direction = direction.as_str();
    let channel = channel.name();
    match outcome {
        DeliveryOutcome::Sent { status } => tracing::info!(
            direction,
            channel,
            visitor_id = visitor.id,
            status,
            "Notification sent"
        ),
        DeliveryOutcome::Recorded => tracing::info!(
            direction,
            channel,
            visitor_id = visitor.id,
            status = %visitor.status,
            "Notification added to security log"
        ),
        DeliveryOutcome::Skipped { reason } => tracing::warn!(
            direction,
            channel,
            visitor_id = visitor.id,
            reason = %reason,
            "Notification skipped"
        ),
        DeliveryOutcome::Failed { error } => tracing::error!(
            direction,
            channel,
            visitor_id = visitor.id,
            error = %error,
            "Notification delivery failed"
        ),
    }
}
