//! Append-only audit trail types for workflow status transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action name recorded when a pre-validation gate is approved or rejected.
pub const PREVALIDATION_STATUS_CHANGE: &str = "prevalidation_status_change";

/// Action name recorded when a DP-2001 request moves along its chain.
pub const DP2001_STATUS_CHANGE: &str = "dp2001_status_change";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEntryId(pub u64);

impl fmt::Display for AuditEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entity families that appear in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditedEntity {
    #[serde(rename = "PreValidation")]
    PreValidation,
    #[serde(rename = "DP2001")]
    Dp2001,
}

impl AuditedEntity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreValidation => "PreValidation",
            Self::Dp2001 => "DP2001",
        }
    }
}

/// One immutable record of a status transition. Entries are never updated
/// or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditEntryId,
    pub action: String,
    pub entity_type: AuditedEntity,
    pub entity_id: u64,
    pub old_value: String,
    pub new_value: String,
    pub timestamp: DateTime<Utc>,
}

/// Entry content before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub action: String,
    pub entity_type: AuditedEntity,
    pub entity_id: u64,
    pub old_value: String,
    pub new_value: String,
    pub timestamp: DateTime<Utc>,
}
