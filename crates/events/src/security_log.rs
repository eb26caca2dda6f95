//! In-process log of security notifications.
//!
//! Entries arrive either from the router's local `app` channel or from the
//! ingestion endpoint. The log is append-only and unbounded; it lives for
//! the lifetime of the process.

use gatepass_core::types::Timestamp;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// JSON key under which the arrival time is stamped on every entry.
pub const RECEIVED_AT_KEY: &str = "timestamp";

/// A single security notification.
///
/// Serializes as the submitted JSON object plus a `timestamp` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityNotification {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(rename = "timestamp")]
    pub received_at: Timestamp,
}

/// Append-only, time-ordered notification log.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the notification router and the HTTP handlers.
#[derive(Default)]
pub struct SecurityLog {
    entries: RwLock<Vec<SecurityNotification>>,
}

impl SecurityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `fields` with the current time and append them.
    ///
    /// An incoming `timestamp` field is replaced by the stamp.
    pub async fn append(&self, mut fields: Map<String, Value>) -> SecurityNotification {
        fields.remove(RECEIVED_AT_KEY);
        let mut entries = self.entries.write().await;
        let entry = SecurityNotification {
            fields,
            received_at: chrono::Utc::now(),
        };
        entries.push(entry.clone());
        entry
    }

    /// All entries, newest first. Entries stamped at the same instant keep
    /// reverse arrival order.
    pub async fn list(&self) -> Vec<SecurityNotification> {
        let mut entries: Vec<_> = self.entries.read().await.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        entries
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
