use super::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

use crate::workflows::personnel::audit::AuditedEntity;
use crate::workflows::personnel::domain::ActionRequestStatus;
use crate::workflows::personnel::engine::WorkflowError;
use crate::workflows::personnel::store::WorkflowStore;

const RACERS: usize = 8;

#[test]
fn racing_advances_produce_exactly_one_winner() {
    let (engine, store, employee_id) = seeded_engine();
    let request = submitted_request(&engine, employee_id);

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            let id = request.id;
            thread::spawn(move || {
                barrier.wait();
                engine.advance_action_request(&principal(), id, ActionRequestStatus::Processing)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("racer thread joins"))
        .collect();

    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1, "exactly one racer may apply the transition");

    for result in results.iter().filter(|result| result.is_err()) {
        match result {
            Err(WorkflowError::Conflict) | Err(WorkflowError::InvalidTransition { .. }) => {}
            other => panic!("unexpected loser outcome: {other:?}"),
        }
    }

    // The entity moved once and the trail shows it once.
    let current = engine.action_request(request.id).expect("record readable");
    assert_eq!(current.status, ActionRequestStatus::Processing);

    let dp2001_entries: Vec<_> = store
        .audit_entries()
        .expect("audit readable")
        .into_iter()
        .filter(|entry| {
            entry.entity_type == AuditedEntity::Dp2001 && entry.entity_id == request.id.0
        })
        .collect();
    assert_eq!(dp2001_entries.len(), 1);
    assert_eq!(dp2001_entries[0].old_value, "submitted");
    assert_eq!(dp2001_entries[0].new_value, "processing");
}

#[test]
fn racing_opposite_terminal_transitions_cannot_both_land() {
    let (engine, store, employee_id) = seeded_engine();
    let request = submitted_request(&engine, employee_id);
    engine
        .advance_action_request(&principal(), request.id, ActionRequestStatus::Processing)
        .expect("advance to processing");

    let barrier = Arc::new(Barrier::new(2));
    let targets = [ActionRequestStatus::Completed, ActionRequestStatus::Rejected];
    let handles: Vec<_> = targets
        .into_iter()
        .map(|target| {
            let engine = engine.clone();
            let barrier = barrier.clone();
            let id = request.id;
            thread::spawn(move || {
                barrier.wait();
                engine.advance_action_request(&principal(), id, target)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("racer thread joins"))
        .collect();

    let winners = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(winners, 1, "a lost update would mean two winners");

    let current = engine.action_request(request.id).expect("record readable");
    assert!(current.status.is_terminal());

    let terminal_entries = store
        .audit_entries()
        .expect("audit readable")
        .into_iter()
        .filter(|entry| {
            entry.entity_type == AuditedEntity::Dp2001
                && entry.entity_id == request.id.0
                && entry.old_value == "processing"
        })
        .count();
    assert_eq!(terminal_entries, 1);
}
