//! Workflow engine: the sole writer of entity status fields.
//!
//! Every operation re-reads current state from the store before validating,
//! then commits the transition through the [`AuditRecorder`] so the status
//! write and its audit entry land atomically. The engine is stateless
//! between calls and safe to share across concurrent callers; per-entity
//! serialization comes from the store's compare-and-swap.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::Principal;

use super::audit::AuditLogEntry;
use super::domain::{
    ActionRequest, ActionRequestId, ActionRequestStatus, ActionType, EmployeeId, NewActionRequest,
    NewPreValidation, PreValidation, PreValidationId, PreValidationStatus,
};
use super::recorder::AuditRecorder;
use super::store::{StatusChange, StoreError, WorkflowStore};

/// Entity families named in `NotFound` failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Employee,
    PreValidation,
    ActionRequest,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Employee => "employee",
            Self::PreValidation => "pre-validation",
            Self::ActionRequest => "DP-2001 request",
        };
        f.write_str(name)
    }
}

/// Error raised by workflow operations. All variants are ordinary typed
/// failures surfaced to the transport layer; `Conflict` is the one kind a
/// caller may reasonably retry after a re-read.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error("pre-validation must be approved")]
    PreconditionFailed,
    #[error("transition lost a concurrent race; re-read and retry")]
    Conflict,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

fn store_failure(kind: EntityKind, err: StoreError) -> WorkflowError {
    match err {
        StoreError::NotFound => WorkflowError::NotFound(kind),
        StoreError::Conflict => WorkflowError::Conflict,
        StoreError::Unavailable(detail) => WorkflowError::StoreUnavailable(detail),
    }
}

pub struct WorkflowEngine<S> {
    store: Arc<S>,
    recorder: AuditRecorder<S>,
}

impl<S> WorkflowEngine<S>
where
    S: WorkflowStore,
{
    pub fn new(store: Arc<S>) -> Self {
        let recorder = AuditRecorder::new(store.clone());
        Self { store, recorder }
    }

    /// Open a pre-validation gate for `employee_id`. Creation is not a
    /// transition, so no audit entry is written.
    pub fn create_prevalidation(
        &self,
        principal: &Principal,
        employee_id: EmployeeId,
        action_type: ActionType,
        comments: Option<String>,
    ) -> Result<PreValidation, WorkflowError> {
        self.store
            .employee(employee_id)
            .map_err(|err| store_failure(EntityKind::Employee, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::Employee))?;

        let created = self
            .store
            .insert_prevalidation(NewPreValidation {
                employee_id,
                action_type,
                comments,
            })
            .map_err(|err| store_failure(EntityKind::PreValidation, err))?;

        debug!(
            principal = %principal,
            prevalidation = %created.id,
            employee = %employee_id,
            action = action_type.label(),
            "pre-validation created"
        );
        Ok(created)
    }

    pub fn approve_prevalidation(
        &self,
        principal: &Principal,
        id: PreValidationId,
    ) -> Result<PreValidation, WorkflowError> {
        self.settle_prevalidation(principal, id, PreValidationStatus::Approved)
    }

    pub fn reject_prevalidation(
        &self,
        principal: &Principal,
        id: PreValidationId,
    ) -> Result<PreValidation, WorkflowError> {
        self.settle_prevalidation(principal, id, PreValidationStatus::Rejected)
    }

    fn settle_prevalidation(
        &self,
        principal: &Principal,
        id: PreValidationId,
        target: PreValidationStatus,
    ) -> Result<PreValidation, WorkflowError> {
        let current = self
            .store
            .prevalidation(id)
            .map_err(|err| store_failure(EntityKind::PreValidation, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::PreValidation))?;

        // Approval is a one-time gate: settling an already-settled record
        // is an error, not a no-op.
        if !current.status.can_transition_to(target) {
            return Err(WorkflowError::InvalidTransition {
                from: current.status.label(),
                to: target.label(),
            });
        }

        self.recorder
            .record(StatusChange::PreValidation {
                id,
                expected: current.status,
                target,
            })
            .map_err(|err| store_failure(EntityKind::PreValidation, err))?;

        info!(
            principal = %principal,
            prevalidation = %id,
            from = current.status.label(),
            to = target.label(),
            "pre-validation settled"
        );
        Ok(PreValidation {
            status: target,
            ..current
        })
    }

    /// File a DP-2001 request. The referenced pre-validation must be
    /// `approved` right now; this is a point-in-time check, not an ongoing
    /// constraint. No audit entry on creation.
    pub fn create_action_request(
        &self,
        principal: &Principal,
        employee_id: EmployeeId,
        prevalidation_id: PreValidationId,
        action_type: ActionType,
        comments: Option<String>,
    ) -> Result<ActionRequest, WorkflowError> {
        self.store
            .employee(employee_id)
            .map_err(|err| store_failure(EntityKind::Employee, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::Employee))?;

        let gate = self
            .store
            .prevalidation(prevalidation_id)
            .map_err(|err| store_failure(EntityKind::PreValidation, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::PreValidation))?;

        if gate.status != PreValidationStatus::Approved {
            return Err(WorkflowError::PreconditionFailed);
        }

        let created = self
            .store
            .insert_action_request(NewActionRequest {
                employee_id,
                prevalidation_id,
                action_type,
                comments,
            })
            .map_err(|err| store_failure(EntityKind::ActionRequest, err))?;

        debug!(
            principal = %principal,
            request = %created.id,
            prevalidation = %prevalidation_id,
            action = action_type.label(),
            "DP-2001 request filed"
        );
        Ok(created)
    }

    /// Move a DP-2001 request one step along its chain. On success exactly
    /// one audit entry is appended in the same commit as the status write.
    pub fn advance_action_request(
        &self,
        principal: &Principal,
        id: ActionRequestId,
        target: ActionRequestStatus,
    ) -> Result<ActionRequest, WorkflowError> {
        let current = self
            .store
            .action_request(id)
            .map_err(|err| store_failure(EntityKind::ActionRequest, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::ActionRequest))?;

        if !current.status.can_advance_to(target) {
            return Err(WorkflowError::InvalidTransition {
                from: current.status.label(),
                to: target.label(),
            });
        }

        self.recorder
            .record(StatusChange::ActionRequest {
                id,
                expected: current.status,
                target,
            })
            .map_err(|err| store_failure(EntityKind::ActionRequest, err))?;

        info!(
            principal = %principal,
            request = %id,
            from = current.status.label(),
            to = target.label(),
            "DP-2001 request advanced"
        );
        Ok(ActionRequest {
            status: target,
            ..current
        })
    }

    pub fn prevalidation(&self, id: PreValidationId) -> Result<PreValidation, WorkflowError> {
        self.store
            .prevalidation(id)
            .map_err(|err| store_failure(EntityKind::PreValidation, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::PreValidation))
    }

    pub fn action_request(&self, id: ActionRequestId) -> Result<ActionRequest, WorkflowError> {
        self.store
            .action_request(id)
            .map_err(|err| store_failure(EntityKind::ActionRequest, err))?
            .ok_or(WorkflowError::NotFound(EntityKind::ActionRequest))
    }

    pub fn audit_log(&self) -> Result<Vec<AuditLogEntry>, WorkflowError> {
        self.store
            .audit_entries()
            .map_err(|err| store_failure(EntityKind::ActionRequest, err))
    }
}
