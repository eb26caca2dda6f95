use std::sync::Arc;

use gatepass_db::VisitStore;
use gatepass_events::{NotificationRouter, SecurityLog};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Visit record store (Postgres or in-memory).
    pub store: Arc<dyn VisitStore>,
    /// Routes visit events to host and security channels.
    pub notifier: Arc<NotificationRouter>,
    /// In-process security notification log.
    pub security_log: Arc<SecurityLog>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
