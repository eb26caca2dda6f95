//! Visit status values and the transition guard.
//!
//! A visit request starts `pending` and is moved to `approved` or `denied`
//! by its host. Only those two decisions are accepted as update input, and
//! the match is exact (case-sensitive).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Visit has been registered and awaits the host's decision.
pub const STATUS_PENDING: &str = "pending";

/// Host agreed to receive the visitor.
pub const STATUS_APPROVED: &str = "approved";

/// Host declined the visit.
pub const STATUS_DENIED: &str = "denied";

/// Values a host may submit when deciding on a visit.
pub const VALID_DECISIONS: &[&str] = &[STATUS_APPROVED, STATUS_DENIED];

/// Lifecycle state of a visit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl VisitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Pending => STATUS_PENDING,
            VisitStatus::Approved => STATUS_APPROVED,
            VisitStatus::Denied => STATUS_DENIED,
        }
    }

    /// Whether the host has already decided on the visit.
    pub fn is_decided(self) -> bool {
        !matches!(self, VisitStatus::Pending)
    }

    /// Parse a host decision. Only `approved` and `denied` are accepted;
    /// `pending` is a valid stored state but never a valid update.
    pub fn parse_decision(value: &str) -> Result<Self, CoreError> {
        match value {
            STATUS_APPROVED => Ok(VisitStatus::Approved),
            STATUS_DENIED => Ok(VisitStatus::Denied),
            _ => Err(CoreError::InvalidStatus(
                "Status must be approved or denied".to_string(),
            )),
        }
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisitStatus {
    type Err = CoreError;

    /// Parse any stored status value, including `pending`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(VisitStatus::Pending),
            STATUS_APPROVED => Ok(VisitStatus::Approved),
            STATUS_DENIED => Ok(VisitStatus::Denied),
            other => Err(CoreError::Internal(format!("Unknown stored visit status '{other}'"))),
        }
    }
}

impl TryFrom<String> for VisitStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Rules applied when a decided visit receives another decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Any status may move to `approved` or `denied`, any number of times.
    #[default]
    Permissive,
    /// Once decided, a visit cannot be changed again.
    Strict,
}

impl TransitionPolicy {
    /// Parse the `VISIT_STATUS_POLICY` setting. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Some(TransitionPolicy::Permissive),
            "strict" => Some(TransitionPolicy::Strict),
            _ => None,
        }
    }

    /// Check that `current` may move to `next` under this policy.
    pub fn check(self, current: VisitStatus, next: VisitStatus) -> Result<(), CoreError> {
        match self {
            TransitionPolicy::Permissive => Ok(()),
            TransitionPolicy::Strict if current.is_decided() => Err(CoreError::Conflict(
                format!("Visit has already been {current} and cannot be changed to {next}"),
            )),
            TransitionPolicy::Strict => Ok(()),
        }
    }
}

/// Validate a raw status update against the current status.
///
/// Returns the parsed decision when the update may be applied.
pub fn validate_transition(
    policy: TransitionPolicy,
    current: VisitStatus,
    requested: &str,
) -> Result<VisitStatus, CoreError> {
    let next = VisitStatus::parse_decision(requested)?;
    policy.check(current, next)?;
    Ok(next)
}
