//! Notification channel selection.
//!
//! Each direction (host, security) has its own selector and URL settings.
//! They are resolved once into a [`Channel`] at start-up; nothing re-reads
//! the environment per notification.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Channel
// ---------------------------------------------------------------------------

/// Where the `app` security channel delivers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppTarget {
    /// Append to the in-process [`SecurityLog`](crate::SecurityLog).
    Local,
    /// POST to a separate security service's ingestion endpoint.
    Remote { base_url: String },
}

/// A resolved delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// Generic JSON webhook. Always has a URL (a placeholder if unconfigured).
    Webhook { url: String },
    /// WeChat Work group robot. `None` means dispatch is skipped.
    Wechat { url: Option<String> },
    /// DingTalk group robot. `None` means dispatch is skipped.
    Dingtalk { url: Option<String> },
    /// Security app (security direction only).
    App { target: AppTarget },
}

impl Channel {
    /// Short name used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Webhook { .. } => "webhook",
            Channel::Wechat { .. } => "wechat",
            Channel::Dingtalk { .. } => "dingtalk",
            Channel::App { .. } => "app",
        }
    }
}

// ---------------------------------------------------------------------------
// Environment keys
// ---------------------------------------------------------------------------

/// Environment keys for one notification direction.
struct ChannelKeys {
    selector: &'static str,
    wechat: &'static str,
    dingtalk: &'static str,
    webhook: &'static str,
    default_webhook: &'static str,
}

const HOST_KEYS: ChannelKeys = ChannelKeys {
    selector: "NOTIFICATION_SERVICE",
    wechat: "WECHAT_WEBHOOK",
    dingtalk: "DINGTALK_WEBHOOK",
    webhook: "HOST_NOTIFICATION_WEBHOOK",
    default_webhook: "https://example.com/webhook",
};

const SECURITY_KEYS: ChannelKeys = ChannelKeys {
    selector: "SECURITY_NOTIFICATION_SERVICE",
    wechat: "SECURITY_WECHAT_WEBHOOK",
    dingtalk: "SECURITY_DINGTALK_WEBHOOK",
    webhook: "SECURITY_NOTIFICATION_WEBHOOK",
    default_webhook: "https://example.com/security_webhook",
};

/// Environment key for the remote security service.
const SECURITY_APP_URL_KEY: &str = "SECURITY_APP_URL";

/// Default base URL of a standalone security service.
pub const DEFAULT_SECURITY_APP_URL: &str = "http://localhost:5001";

/// Environment key for the outbound notification timeout.
const TIMEOUT_KEY: &str = "NOTIFICATION_TIMEOUT_SECS";

/// Default timeout for a single outbound notification.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// NotificationConfig
// ---------------------------------------------------------------------------

/// Resolved notification settings for both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Channel for "new visit" notifications to the host.
    pub host: Channel,
    /// Channel for "status changed" notifications to security.
    pub security: Channel,
    /// Bound on each outbound HTTP call.
    pub timeout: Duration,
}

impl NotificationConfig {
    /// Load from environment variables.
    ///
    /// `forward_app` selects whether the `app` security channel POSTs to
    /// `SECURITY_APP_URL` (split deployment) or appends locally (unified).
    ///
    /// | Env Var                          | Default                                |
    /// |----------------------------------|----------------------------------------|
    /// | `NOTIFICATION_SERVICE`           | `webhook`                              |
    /// | `WECHAT_WEBHOOK`                 | unset                                  |
    /// | `DINGTALK_WEBHOOK`               | unset                                  |
    /// | `HOST_NOTIFICATION_WEBHOOK`      | `https://example.com/webhook`          |
    /// | `SECURITY_NOTIFICATION_SERVICE`  | `webhook`                              |
    /// | `SECURITY_WECHAT_WEBHOOK`        | unset                                  |
    /// | `SECURITY_DINGTALK_WEBHOOK`      | unset                                  |
    /// | `SECURITY_NOTIFICATION_WEBHOOK`  | `https://example.com/security_webhook` |
    /// | `SECURITY_APP_URL`               | `http://localhost:5001`                |
    /// | `NOTIFICATION_TIMEOUT_SECS`      | `10`                                   |
    pub fn from_env(forward_app: bool) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), forward_app)
    }

    /// Resolve settings through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Selectors are case-insensitive;
    /// unknown selector values fall back to `webhook`.
    pub fn from_lookup<F>(lookup: F, forward_app: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = resolve(&get, &HOST_KEYS, None);

        let app_target = if forward_app {
            AppTarget::Remote {
                base_url: get(SECURITY_APP_URL_KEY)
                    .unwrap_or_else(|| DEFAULT_SECURITY_APP_URL.to_string()),
            }
        } else {
            AppTarget::Local
        };
        let security = resolve(&get, &SECURITY_KEYS, Some(app_target));

        let timeout = match get(TIMEOUT_KEY) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Invalid {TIMEOUT_KEY}, using default");
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Self {
            host,
            security,
            timeout,
        }
    }
}

/// Resolve one direction's channel. `app` is only honoured when an
/// `app_target` is supplied (the security direction).
fn resolve<G>(get: &G, keys: &ChannelKeys, app_target: Option<AppTarget>) -> Channel
where
    G: Fn(&str) -> Option<String>,
{
    let selector = get(keys.selector)
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_else(|| "webhook".to_string());

    match (selector.as_str(), app_target) {
        ("wechat", _) => Channel::Wechat {
            url: get(keys.wechat),
        },
        ("dingtalk", _) => Channel::Dingtalk {
            url: get(keys.dingtalk),
        },
        ("app", Some(target)) => Channel::App { target },
        (other, _) => {
            if other != "webhook" {
                tracing::warn!(
                    key = keys.selector,
                    value = other,
                    "Unknown notification service, falling back to webhook"
                );
            }
            Channel::Webhook {
                url: get(keys.webhook).unwrap_or_else(|| keys.default_webhook.to_string()),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
