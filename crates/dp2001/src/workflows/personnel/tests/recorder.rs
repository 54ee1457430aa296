use super::common::*;
use std::sync::Arc;

use crate::workflows::personnel::audit::{
    AuditedEntity, DP2001_STATUS_CHANGE, PREVALIDATION_STATUS_CHANGE,
};
use crate::workflows::personnel::domain::{ActionRequestStatus, ActionType, PreValidationStatus};
use crate::workflows::personnel::engine::{WorkflowEngine, WorkflowError};
use crate::workflows::personnel::store::WorkflowStore;

#[test]
fn creation_is_not_audited() {
    let (engine, store, employee_id) = seeded_engine();

    let gate = approved_prevalidation(&engine, employee_id);
    engine
        .create_action_request(&principal(), employee_id, gate.id, ActionType::Hire, None)
        .expect("DP-2001 request filed");

    // Only the approval transition is on the trail; neither creation is.
    let entries = store.audit_entries().expect("audit readable");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, PREVALIDATION_STATUS_CHANGE);
}

#[test]
fn advance_appends_exactly_one_entry_with_old_and_new() {
    let (engine, store, employee_id) = seeded_engine();
    let request = submitted_request(&engine, employee_id);
    let before = store.audit_entries().expect("audit readable").len();

    engine
        .advance_action_request(&principal(), request.id, ActionRequestStatus::Processing)
        .expect("advance to processing");

    let entries = store.audit_entries().expect("audit readable");
    assert_eq!(entries.len(), before + 1);

    let entry = entries.last().expect("entry appended");
    assert_eq!(entry.action, DP2001_STATUS_CHANGE);
    assert_eq!(entry.entity_type, AuditedEntity::Dp2001);
    assert_eq!(entry.entity_id, request.id.0);
    assert_eq!(entry.old_value, "submitted");
    assert_eq!(entry.new_value, "processing");
}

#[test]
fn gate_settlement_is_audited() {
    let (engine, store, employee_id) = seeded_engine();
    let gate = engine
        .create_prevalidation(&principal(), employee_id, ActionType::Transfer, None)
        .expect("pre-validation created");

    engine
        .reject_prevalidation(&principal(), gate.id)
        .expect("rejection succeeds");

    let entries = store.audit_entries().expect("audit readable");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, PREVALIDATION_STATUS_CHANGE);
    assert_eq!(entries[0].entity_type, AuditedEntity::PreValidation);
    assert_eq!(entries[0].entity_id, gate.id.0);
    assert_eq!(entries[0].old_value, "pending");
    assert_eq!(entries[0].new_value, "rejected");
}

#[test]
fn visible_status_matches_latest_audit_entry() {
    let (engine, store, employee_id) = seeded_engine();
    let request = submitted_request(&engine, employee_id);

    engine
        .advance_action_request(&principal(), request.id, ActionRequestStatus::Processing)
        .expect("advance to processing");
    engine
        .advance_action_request(&principal(), request.id, ActionRequestStatus::Completed)
        .expect("advance to completed");

    let current = engine.action_request(request.id).expect("record readable");
    let latest = store
        .audit_entries()
        .expect("audit readable")
        .into_iter()
        .filter(|entry| {
            entry.entity_type == AuditedEntity::Dp2001 && entry.entity_id == request.id.0
        })
        .last()
        .expect("dp2001 entries recorded");

    assert_eq!(current.status.label(), latest.new_value);
}

#[test]
fn failed_validation_appends_nothing() {
    let (engine, store, employee_id) = seeded_engine();
    let request = submitted_request(&engine, employee_id);
    let before = store.audit_entries().expect("audit readable").len();

    let result =
        engine.advance_action_request(&principal(), request.id, ActionRequestStatus::Completed);
    assert!(matches!(
        result,
        Err(WorkflowError::InvalidTransition { .. })
    ));

    assert_eq!(store.audit_entries().expect("audit readable").len(), before);
}

#[test]
fn broken_commit_leaves_state_unchanged_and_unaudited() {
    let store = Arc::new(BrokenCommitStore::default());
    let employee = store
        .inner
        .insert_employee(new_employee())
        .expect("employee inserted");
    let engine = WorkflowEngine::new(store.clone());

    let gate = engine
        .create_prevalidation(&principal(), employee.id, ActionType::Hire, None)
        .expect("pre-validation created");
    let result = engine.approve_prevalidation(&principal(), gate.id);

    assert!(matches!(result, Err(WorkflowError::StoreUnavailable(_))));

    // Neither half of the commit may land: status still pending, no entry.
    let stored = store
        .inner
        .prevalidation(gate.id)
        .expect("record readable")
        .expect("record present");
    assert_eq!(stored.status, PreValidationStatus::Pending);
    assert!(store.inner.audit_entries().expect("audit readable").is_empty());
}
