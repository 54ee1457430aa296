//! Two-stage personnel action workflow: pre-validation gate, DP-2001
//! request lifecycle, and the audit trail tying the two together.

pub mod audit;
pub mod domain;
pub mod engine;
pub mod memory;
pub mod recorder;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use audit::{
    AuditEntryId, AuditLogEntry, AuditedEntity, NewAuditEntry, DP2001_STATUS_CHANGE,
    PREVALIDATION_STATUS_CHANGE,
};
pub use domain::{
    ActionRequest, ActionRequestId, ActionRequestStatus, ActionType, Employee, EmployeeId,
    EmployeeStatus, NewActionRequest, NewEmployee, NewPreValidation, PreValidation,
    PreValidationId, PreValidationStatus,
};
pub use engine::{EntityKind, WorkflowEngine, WorkflowError};
pub use memory::InMemoryWorkflowStore;
pub use recorder::AuditRecorder;
pub use router::{
    personnel_router, AdvanceDp2001Request, AdvanceTarget, CreateDp2001Request,
    CreatePreValidationRequest,
};
pub use store::{StatusChange, StoreError, WorkflowStore};
