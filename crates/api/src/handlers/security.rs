//! Handlers for the security notification log.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /api/security/notifications
///
/// Ingest a notification from another service. Any JSON object is
/// accepted; it is stored as-is with a `timestamp` stamp.
pub async fn receive_notification(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Value::Object(fields) = body else {
        return Err(AppError::BadRequest(
            "Notification body must be a JSON object".to_string(),
        ));
    };

    let entry = state.security_log.append(fields).await;
    tracing::info!(
        visitor_id = ?entry.fields.get("visitor_id"),
        received_at = %entry.received_at,
        "Security notification received"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Notification received successfully")),
    ))
}

/// GET /api/security/notifications
///
/// All notifications, newest first.
pub async fn list_notifications(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.security_log.list().await)
}
