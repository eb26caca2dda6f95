//! Repository for the `visitors` table.

use gatepass_core::registration::VisitorDetails;
use gatepass_core::status::VisitStatus;
use gatepass_core::types::DbId;
use sqlx::PgPool;

use crate::models::visitor::Visitor;

/// Column list for visitors queries.
const COLUMNS: &str = "id, name, phone, company, host_name, host_company, host_phone, \
    visit_time, status";

/// Provides CRUD operations for visit requests.
pub struct VisitorRepo;

impl VisitorRepo {
    /// Insert a new pending visit request, returning the created row.
    pub async fn create(pool: &PgPool, input: &VisitorDetails) -> Result<Visitor, sqlx::Error> {
        let query = format!(
            "INSERT INTO visitors
                (name, phone, company, host_name, host_company, host_phone, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.host_name)
            .bind(&input.host_company)
            .bind(&input.host_phone)
            .bind(VisitStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a visit request by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visitors WHERE id = $1");
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all visit requests, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Visitor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visitors ORDER BY visit_time DESC, id DESC");
        sqlx::query_as::<_, Visitor>(&query).fetch_all(pool).await
    }

    /// Overwrite the status of a visit request.
    ///
    /// Returns `None` if no row has the given ID. Last write wins.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: VisitStatus,
    ) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!("UPDATE visitors SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Record a decision only if the visit request is still pending.
    ///
    /// Returns `None` if no row has the given ID or the row was already
    /// decided. The status check and the write are a single statement.
    pub async fn update_pending_status(
        pool: &PgPool,
        id: DbId,
        status: VisitStatus,
    ) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!(
            "UPDATE visitors SET status = $2 WHERE id = $1 AND status = $3 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(VisitStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }
}
