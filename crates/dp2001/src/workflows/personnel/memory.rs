//! In-memory [`WorkflowStore`] used by the service binary and the test
//! suite. One mutex guards all tables, so the compare-and-swap plus audit
//! append in [`WorkflowStore::commit_transition`] is a single critical
//! section.

use std::collections::HashMap;
use std::sync::Mutex;

use super::audit::{AuditEntryId, AuditLogEntry, NewAuditEntry};
use super::domain::{
    ActionRequest, ActionRequestId, ActionRequestStatus, Employee, EmployeeId, EmployeeStatus,
    NewActionRequest, NewEmployee, NewPreValidation, PreValidation, PreValidationId,
    PreValidationStatus,
};
use super::store::{StatusChange, StoreError, WorkflowStore};

#[derive(Default)]
pub struct InMemoryWorkflowStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    employees: HashMap<u64, Employee>,
    prevalidations: HashMap<u64, PreValidation>,
    action_requests: HashMap<u64, ActionRequest>,
    audit: Vec<AuditLogEntry>,
    next_employee_id: u64,
    next_prevalidation_id: u64,
    next_action_request_id: u64,
    next_audit_id: u64,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored DP-2001 requests. Inspection hook for tests and the
    /// demo walkthrough.
    pub fn action_request_count(&self) -> usize {
        let guard = self.inner.lock().expect("store mutex poisoned");
        guard.action_requests.len()
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn insert_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.next_employee_id += 1;
        let record = Employee {
            id: EmployeeId(guard.next_employee_id),
            name: new.name,
            title: new.title,
            location: new.location,
            union_affiliation: new.union_affiliation,
            salary_step: new.salary_step,
            status: EmployeeStatus::Active,
        };
        guard.employees.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.employees.get(&id.0).cloned())
    }

    fn insert_prevalidation(&self, new: NewPreValidation) -> Result<PreValidation, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.next_prevalidation_id += 1;
        let record = PreValidation {
            id: PreValidationId(guard.next_prevalidation_id),
            employee_id: new.employee_id,
            action_type: new.action_type,
            status: PreValidationStatus::Pending,
            comments: new.comments,
        };
        guard.prevalidations.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn prevalidation(&self, id: PreValidationId) -> Result<Option<PreValidation>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.prevalidations.get(&id.0).cloned())
    }

    fn insert_action_request(&self, new: NewActionRequest) -> Result<ActionRequest, StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        guard.next_action_request_id += 1;
        let record = ActionRequest {
            id: ActionRequestId(guard.next_action_request_id),
            employee_id: new.employee_id,
            prevalidation_id: new.prevalidation_id,
            action_type: new.action_type,
            status: ActionRequestStatus::Submitted,
            comments: new.comments,
        };
        guard.action_requests.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn action_request(&self, id: ActionRequestId) -> Result<Option<ActionRequest>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.action_requests.get(&id.0).cloned())
    }

    fn commit_transition(
        &self,
        change: StatusChange,
        entry: NewAuditEntry,
    ) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("store mutex poisoned");

        match change {
            StatusChange::PreValidation {
                id,
                expected,
                target,
            } => {
                let record = guard
                    .prevalidations
                    .get_mut(&id.0)
                    .ok_or(StoreError::NotFound)?;
                if record.status != expected {
                    return Err(StoreError::Conflict);
                }
                record.status = target;
            }
            StatusChange::ActionRequest {
                id,
                expected,
                target,
            } => {
                let record = guard
                    .action_requests
                    .get_mut(&id.0)
                    .ok_or(StoreError::NotFound)?;
                if record.status != expected {
                    return Err(StoreError::Conflict);
                }
                record.status = target;
            }
        }

        guard.next_audit_id += 1;
        let id = AuditEntryId(guard.next_audit_id);
        guard.audit.push(AuditLogEntry {
            id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            old_value: entry.old_value,
            new_value: entry.new_value,
            timestamp: entry.timestamp,
        });
        Ok(())
    }

    fn audit_entries(&self) -> Result<Vec<AuditLogEntry>, StoreError> {
        let guard = self.inner.lock().expect("store mutex poisoned");
        Ok(guard.audit.clone())
    }
}
