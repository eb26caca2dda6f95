//! Shared response body types for API handlers.

use gatepass_core::types::DbId;
use serde::Serialize;

/// `{ "message": ..., "id": ... }` acknowledgement body.
///
/// `id` is only present when the operation created a record.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn with_id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }
}
