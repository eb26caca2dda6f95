pub mod health;
pub mod security;
pub mod visitor;

use axum::Router;

use crate::config::DeploymentMode;
use crate::state::AppState;

/// Build the `/api` route tree for the given deployment mode.
///
/// Route hierarchy:
///
/// ```text
/// /visitors                       register, list            (unified, backend)
/// /visitors/{id}                  get                       (unified, backend)
/// /visitors/{id}/status           update status (PUT)       (unified, backend)
///
/// /security/notifications         ingest (POST), list (GET) (unified, security)
/// ```
pub fn api_routes(mode: DeploymentMode) -> Router<AppState> {
    let mut router = Router::new();

    if mode.serves_visitors() {
        router = router.nest("/visitors", visitor::router());
    }

    if mode.serves_security() {
        router = router.nest("/security", security::router());
    }

    router
}
