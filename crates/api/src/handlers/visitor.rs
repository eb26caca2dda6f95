//! Handlers for visit registration and the host's approval decision.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gatepass_core::registration::RegisterVisitor;
use gatepass_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for the status endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// POST /api/visitors
///
/// Register a visit. The host is notified after the record is stored;
/// delivery runs in the background and cannot affect the response.
pub async fn register_visitor(
    State(state): State<AppState>,
    payload: Result<Json<RegisterVisitor>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let details = input.into_details()?;

    let visitor = state.store.create(details).await?;

    tracing::info!(
        visitor_id = visitor.id,
        host_name = %visitor.host_name,
        "Visitor registered"
    );

    let id = visitor.id;
    // Detached: the outcome is only logged.
    let _ = state.notifier.notify_host(visitor);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Visitor registered successfully").with_id(id)),
    ))
}

/// GET /api/visitors
///
/// All visit requests, newest first.
pub async fn list_visitors(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let visitors = state.store.list().await?;
    Ok(Json(visitors))
}

/// An ID segment that is not an integer cannot name a visitor, so it is
/// reported as not found.
fn visitor_id(path: Result<Path<DbId>, PathRejection>) -> AppResult<DbId> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound("Visitor not found".to_string()))
}

/// GET /api/visitors/{id}
pub async fn get_visitor(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let id = visitor_id(path)?;
    let visitor = state.store.get(id).await?;
    Ok(Json(visitor))
}

/// PUT /api/visitors/{id}/status
///
/// Record the host's decision and notify security. An unknown ID is
/// reported before the body is inspected; an unreadable body counts as an
/// invalid status.
pub async fn update_status(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = visitor_id(path)?;
    let requested = payload
        .ok()
        .and_then(|Json(body)| body.status)
        .unwrap_or_default();

    let visitor = state.store.set_status(id, &requested).await?;

    tracing::info!(
        visitor_id = visitor.id,
        status = %visitor.status,
        "Visitor status updated"
    );

    let message = format!("Visitor status updated to {}", visitor.status);
    // HTTP channels deliver in the background; the local log is already updated.
    let _ = state.notifier.notify_security(visitor).await;

    Ok(Json(MessageResponse::new(message)))
}
