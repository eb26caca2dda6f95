//! Route definitions for the security notification log.

use axum::routing::get;
use axum::Router;

use crate::handlers::security;
use crate::state::AppState;

/// Security routes, nested under `/security`.
///
/// ```text
/// POST   /notifications    receive_notification
/// GET    /notifications    list_notifications
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        get(security::list_notifications).post(security::receive_notification),
    )
}
