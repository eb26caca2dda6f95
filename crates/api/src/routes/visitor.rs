//! Route definitions for visit requests.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::visitor;
use crate::state::AppState;

/// Visit routes, nested under `/visitors`.
///
/// ```text
/// POST   /                 register_visitor
/// GET    /                 list_visitors
/// GET    /{id}             get_visitor
/// PUT    /{id}/status      update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(visitor::list_visitors).post(visitor::register_visitor),
        )
        .route("/{id}", get(visitor::get_visitor))
        .route("/{id}/status", put(visitor::update_status))
}
