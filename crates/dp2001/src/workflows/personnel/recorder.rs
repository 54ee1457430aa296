//! Audit recorder: turns a validated status change into exactly one audit
//! entry, committed together with the status write.
//!
//! The recorder never sees unvalidated transitions; the engine rejects bad
//! edges before calling in, so a failed validation leaves the store
//! untouched. All-or-nothing behavior for the write pair is delegated to
//! [`WorkflowStore::commit_transition`], the store's single transactional
//! boundary.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::audit::{AuditedEntity, NewAuditEntry, DP2001_STATUS_CHANGE, PREVALIDATION_STATUS_CHANGE};
use super::store::{StatusChange, StoreError, WorkflowStore};

pub struct AuditRecorder<S> {
    store: Arc<S>,
}

impl<S> AuditRecorder<S>
where
    S: WorkflowStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Commit `change` together with its audit entry. A lost
    /// compare-and-swap surfaces as [`StoreError::Conflict`] and appends
    /// nothing.
    pub fn record(&self, change: StatusChange) -> Result<(), StoreError> {
        let entry = entry_for(&change, Utc::now());
        self.store.commit_transition(change, entry)
    }
}

fn entry_for(change: &StatusChange, timestamp: DateTime<Utc>) -> NewAuditEntry {
    match change {
        StatusChange::PreValidation {
            id,
            expected,
            target,
        } => NewAuditEntry {
            action: PREVALIDATION_STATUS_CHANGE.to_string(),
            entity_type: AuditedEntity::PreValidation,
            entity_id: id.0,
            old_value: expected.label().to_string(),
            new_value: target.label().to_string(),
            timestamp,
        },
        StatusChange::ActionRequest {
            id,
            expected,
            target,
        } => NewAuditEntry {
            action: DP2001_STATUS_CHANGE.to_string(),
            entity_type: AuditedEntity::Dp2001,
            entity_id: id.0,
            old_value: expected.label().to_string(),
            new_value: target.label().to_string(),
            timestamp,
        },
    }
}
