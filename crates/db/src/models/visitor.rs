//! Visit request model.

use gatepass_core::registration::VisitorDetails;
use gatepass_core::status::VisitStatus;
use gatepass_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `visitors` table.
///
/// Serializes to the public visitor object:
/// `{id, name, phone, company, host_name, host_company, host_phone, visit_time, status}`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Visitor {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub company: String,
    pub host_name: String,
    pub host_company: String,
    pub host_phone: String,
    pub visit_time: Timestamp,
    #[sqlx(try_from = "String")]
    pub status: VisitStatus,
}

impl Visitor {
    /// Build a fresh pending record from validated details.
    pub fn new_pending(id: DbId, details: VisitorDetails, visit_time: Timestamp) -> Self {
        Self {
            id,
            name: details.name,
            phone: details.phone,
            company: details.company,
            host_name: details.host_name,
            host_company: details.host_company,
            host_phone: details.host_phone,
            visit_time,
            status: VisitStatus::Pending,
        }
    }
}
