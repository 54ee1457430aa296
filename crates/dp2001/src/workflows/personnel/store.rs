//! Storage contract consumed by the workflow engine.
//!
//! The engine owns no entity state; everything durable lives behind
//! [`WorkflowStore`]. Status writes go exclusively through
//! [`WorkflowStore::commit_transition`], a compare-and-swap conditioned on
//! the previously observed status, joined atomically with the audit append.

use super::audit::{AuditLogEntry, NewAuditEntry};
use super::domain::{
    ActionRequest, ActionRequestId, ActionRequestStatus, Employee, EmployeeId, NewActionRequest,
    NewEmployee, NewPreValidation, PreValidation, PreValidationId, PreValidationStatus,
};

/// A requested status write, carrying the status observed when the
/// transition was validated. The store must refuse the write if the stored
/// status no longer matches `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    PreValidation {
        id: PreValidationId,
        expected: PreValidationStatus,
        target: PreValidationStatus,
    },
    ActionRequest {
        id: ActionRequestId,
        expected: ActionRequestStatus,
        target: ActionRequestStatus,
    },
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("status changed concurrently")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction so the engine and recorder can be exercised against
/// doubles in isolation. Ids are assigned by the implementation.
pub trait WorkflowStore: Send + Sync {
    fn insert_employee(&self, new: NewEmployee) -> Result<Employee, StoreError>;
    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    fn insert_prevalidation(&self, new: NewPreValidation) -> Result<PreValidation, StoreError>;
    fn prevalidation(&self, id: PreValidationId) -> Result<Option<PreValidation>, StoreError>;

    fn insert_action_request(&self, new: NewActionRequest) -> Result<ActionRequest, StoreError>;
    fn action_request(&self, id: ActionRequestId) -> Result<Option<ActionRequest>, StoreError>;

    /// Apply `change` and append `entry` as one atomic commit. Either both
    /// writes land or neither does; a lost compare-and-swap surfaces as
    /// [`StoreError::Conflict`] with nothing written.
    fn commit_transition(
        &self,
        change: StatusChange,
        entry: NewAuditEntry,
    ) -> Result<(), StoreError>;

    /// All audit entries in append order.
    fn audit_entries(&self) -> Result<Vec<AuditLogEntry>, StoreError>;
}
