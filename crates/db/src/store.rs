//! The visit record store.
//!
//! [`VisitStore`] is the only way to create visit requests or change their
//! status. Status changes go through the transition guard in
//! [`gatepass_core::status`] before anything is written, so a rejected
//! update never mutates the record.

use async_trait::async_trait;
use gatepass_core::error::CoreError;
use gatepass_core::registration::VisitorDetails;
use gatepass_core::status::{validate_transition, TransitionPolicy, VisitStatus};
use gatepass_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::visitor::Visitor;
use crate::repositories::VisitorRepo;
use crate::DbPool;

/// Entity name used in not-found errors.
const ENTITY: &str = "Visitor";

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain error (not found, invalid status, conflict).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn not_found(id: DbId) -> StoreError {
    StoreError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// Keyed store of visit requests.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Persist a new pending visit request with a fresh ID and creation time.
    async fn create(&self, details: VisitorDetails) -> Result<Visitor, StoreError>;

    /// Look up a single visit request, or `None` if the ID is unknown.
    async fn find(&self, id: DbId) -> Result<Option<Visitor>, StoreError>;

    /// All visit requests ordered by creation time, newest first.
    async fn list(&self) -> Result<Vec<Visitor>, StoreError>;

    /// Write a status that has already passed the transition guard.
    async fn write_status(&self, id: DbId, status: VisitStatus) -> Result<Visitor, StoreError>;

    /// Write a status only while the record is still `pending`, as one
    /// atomic step. Returns `None` when no pending record matched.
    async fn write_first_decision(
        &self,
        id: DbId,
        status: VisitStatus,
    ) -> Result<Option<Visitor>, StoreError>;

    /// Confirm the backing storage is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Transition rules applied by [`set_status`](VisitStore::set_status).
    fn policy(&self) -> TransitionPolicy;

    /// Look up a visit request, failing with `NotFound` if it does not exist.
    async fn get(&self, id: DbId) -> Result<Visitor, StoreError> {
        self.find(id).await?.ok_or_else(|| not_found(id))
    }

    /// Validate a requested status and persist it.
    ///
    /// Unknown IDs fail with `NotFound` before the value is inspected.
    /// Anything other than `approved` or `denied` fails with
    /// `InvalidStatus` and leaves the record untouched.
    ///
    /// Under [`TransitionPolicy::Strict`] the write itself re-checks that
    /// the record is pending, so of two concurrent first decisions exactly
    /// one is applied and the other fails with `Conflict`. Under the
    /// permissive policy the last write wins.
    async fn set_status(&self, id: DbId, requested: &str) -> Result<Visitor, StoreError> {
        let policy = self.policy();
        let current = self.get(id).await?;
        let next = validate_transition(policy, current.status, requested)?;

        match policy {
            TransitionPolicy::Permissive => self.write_status(id, next).await,
            TransitionPolicy::Strict => match self.write_first_decision(id, next).await? {
                Some(visitor) => Ok(visitor),
                // Decided by someone else between the read and the write.
                None => {
                    let latest = self.get(id).await?;
                    policy.check(latest.status, next)?;
                    Err(CoreError::Conflict(format!("Visit {id} was decided concurrently")).into())
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// PgVisitStore
// ---------------------------------------------------------------------------

/// Postgres-backed store using [`VisitorRepo`].
pub struct PgVisitStore {
    pool: DbPool,
    policy: TransitionPolicy,
}

impl PgVisitStore {
    pub fn new(pool: DbPool, policy: TransitionPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl VisitStore for PgVisitStore {
    async fn create(&self, details: VisitorDetails) -> Result<Visitor, StoreError> {
        Ok(VisitorRepo::create(&self.pool, &details).await?)
    }

    async fn find(&self, id: DbId) -> Result<Option<Visitor>, StoreError> {
        Ok(VisitorRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list(&self) -> Result<Vec<Visitor>, StoreError> {
        Ok(VisitorRepo::list(&self.pool).await?)
    }

    async fn write_status(&self, id: DbId, status: VisitStatus) -> Result<Visitor, StoreError> {
        VisitorRepo::update_status(&self.pool, id, status)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn write_first_decision(
        &self,
        id: DbId,
        status: VisitStatus,
    ) -> Result<Option<Visitor>, StoreError> {
        Ok(VisitorRepo::update_pending_status(&self.pool, id, status).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn policy(&self) -> TransitionPolicy {
        self.policy
    }
}

// ---------------------------------------------------------------------------
// MemoryVisitStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    last_id: DbId,
    rows: Vec<Visitor>,
}

/// In-process store used when no database is configured, and in tests.
///
/// Contents are lost on restart. IDs start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryVisitStore {
    state: RwLock<MemoryState>,
    policy: TransitionPolicy,
}

impl MemoryVisitStore {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            policy,
        }
    }
}

#[async_trait]
impl VisitStore for MemoryVisitStore {
    async fn create(&self, details: VisitorDetails) -> Result<Visitor, StoreError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let visitor = Visitor::new_pending(state.last_id, details, chrono::Utc::now());
        state.rows.push(visitor.clone());
        Ok(visitor)
    }

    async fn find(&self, id: DbId) -> Result<Option<Visitor>, StoreError> {
        let state = self.state.read().await;
        Ok(state.rows.iter().find(|v| v.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Visitor>, StoreError> {
        let mut rows = self.state.read().await.rows.clone();
        rows.sort_by(|a, b| {
            b.visit_time
                .cmp(&a.visit_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn write_status(&self, id: DbId, status: VisitStatus) -> Result<Visitor, StoreError> {
        let mut state = self.state.write().await;
        let row = state
            .rows
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| not_found(id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn write_first_decision(
        &self,
        id: DbId,
        status: VisitStatus,
    ) -> Result<Option<Visitor>, StoreError> {
        let mut state = self.state.write().await;
        let row = state
            .rows
            .iter_mut()
            .find(|v| v.id == id && !v.status.is_decided());
        Ok(row.map(|row| {
            row.status = status;
            row.clone()
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn policy(&self) -> TransitionPolicy {
        self.policy
    }
}
