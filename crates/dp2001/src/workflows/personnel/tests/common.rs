use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::auth::Principal;
use crate::workflows::personnel::audit::{AuditLogEntry, NewAuditEntry};
use crate::workflows::personnel::domain::{
    ActionRequest, ActionRequestId, ActionType, Employee, EmployeeId, NewActionRequest,
    NewEmployee, NewPreValidation, PreValidation, PreValidationId,
};
use crate::workflows::personnel::engine::WorkflowEngine;
use crate::workflows::personnel::memory::InMemoryWorkflowStore;
use crate::workflows::personnel::store::{StatusChange, StoreError, WorkflowStore};

pub(super) fn principal() -> Principal {
    Principal("hr-ops".to_string())
}

pub(super) fn new_employee() -> NewEmployee {
    NewEmployee {
        name: "Dana Reyes".to_string(),
        title: "Field Technician".to_string(),
        location: "Queens Yard".to_string(),
        union_affiliation: Some("Local 237".to_string()),
        salary_step: Some("Step 3".to_string()),
    }
}

pub(super) fn seeded_engine() -> (
    Arc<WorkflowEngine<InMemoryWorkflowStore>>,
    Arc<InMemoryWorkflowStore>,
    EmployeeId,
) {
    let store = Arc::new(InMemoryWorkflowStore::default());
    let employee = store
        .insert_employee(new_employee())
        .expect("employee inserted");
    let engine = Arc::new(WorkflowEngine::new(store.clone()));
    (engine, store, employee.id)
}

pub(super) fn approved_prevalidation(
    engine: &WorkflowEngine<InMemoryWorkflowStore>,
    employee_id: EmployeeId,
) -> PreValidation {
    let created = engine
        .create_prevalidation(&principal(), employee_id, ActionType::Hire, None)
        .expect("pre-validation created");
    engine
        .approve_prevalidation(&principal(), created.id)
        .expect("pre-validation approved")
}

pub(super) fn submitted_request(
    engine: &WorkflowEngine<InMemoryWorkflowStore>,
    employee_id: EmployeeId,
) -> ActionRequest {
    let gate = approved_prevalidation(engine, employee_id);
    engine
        .create_action_request(&principal(), employee_id, gate.id, ActionType::Hire, None)
        .expect("DP-2001 request filed")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

/// Store double whose transactional commit always fails; reads and inserts
/// delegate to a real in-memory store so the aftermath can be inspected.
pub(super) struct BrokenCommitStore {
    pub(super) inner: InMemoryWorkflowStore,
}

impl Default for BrokenCommitStore {
    fn default() -> Self {
        Self {
            inner: InMemoryWorkflowStore::default(),
        }
    }
}

impl WorkflowStore for BrokenCommitStore {
    fn insert_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        self.inner.insert_employee(new)
    }

    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        self.inner.employee(id)
    }

    fn insert_prevalidation(&self, new: NewPreValidation) -> Result<PreValidation, StoreError> {
        self.inner.insert_prevalidation(new)
    }

    fn prevalidation(&self, id: PreValidationId) -> Result<Option<PreValidation>, StoreError> {
        self.inner.prevalidation(id)
    }

    fn insert_action_request(&self, new: NewActionRequest) -> Result<ActionRequest, StoreError> {
        self.inner.insert_action_request(new)
    }

    fn action_request(&self, id: ActionRequestId) -> Result<Option<ActionRequest>, StoreError> {
        self.inner.action_request(id)
    }

    fn commit_transition(
        &self,
        _change: StatusChange,
        _entry: NewAuditEntry,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("commit channel down".to_string()))
    }

    fn audit_entries(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        self.inner.audit_entries()
    }
}
