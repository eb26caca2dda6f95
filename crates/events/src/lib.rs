//! Gatepass notification infrastructure.
//!
//! - [`Channel`] / [`NotificationConfig`]: delivery channel per direction,
//!   resolved once from configuration.
//! - [`message`]: human-readable messages and JSON payloads.
//! - [`delivery`]: outbound webhook delivery.
//! - [`SecurityLog`]: in-process, append-only log of security notifications.
//! - [`NotificationRouter`]: routes "visit created" to the host channel and
//!   "status changed" to the security channel, best-effort.

pub mod channel;
pub mod delivery;
pub mod message;
pub mod router;
pub mod security_log;

pub use channel::{AppTarget, Channel, NotificationConfig};
pub use delivery::webhook::{WebhookDelivery, WebhookError};
pub use router::{DeliveryOutcome, Direction, NotificationRouter};
pub use security_log::{SecurityLog, SecurityNotification};
