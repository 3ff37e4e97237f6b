//! Canonical snippet collection and optimistic mutation bookkeeping.
//!
//! [`SnippetList`] is the only writer of displayed records. Every change goes
//! through `replace_all`, `insert`, or a `begin_*`/`resolve_*` pair, and each
//! of those re-sorts the view and bumps [`SnippetList::revision`] exactly once.

use crate::error::{ApiError, Rejection};
use crate::models::snippet::{Snippet, SnippetPatch};
use crate::mutation::{
    DeleteOutcome, MutationKind, MutationStatus, PendingMutation, UpdateOutcome,
};
use crate::sort::{sort_in_place, SortSpec};
use std::collections::HashMap;


/// Sorted, optimistic view of the snippet collection.
#[derive(Debug, Default)]
pub struct SnippetList {
    records: Vec<Snippet>,
    sort: SortSpec,
    in_flight: HashMap<String, PendingMutation>,
    errors: HashMap<String, String>,
    revision: u64,
    next_attempt: u64,
}

impl SnippetList {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Records in display order.
    pub fn view(&self) -> &[Snippet] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    /// Change counter; increases by one for every applied change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// In-flight mutation for `id`, if any.
    pub fn pending(&self, id: &str) -> Option<&PendingMutation> {
        self.in_flight.get(id)
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains_key(id)
    }

    /// Last surfaced failure message for `id`.
    pub fn error_for(&self, id: &str) -> Option<&str> {
        self.errors.get(id).map(String::as_str)
    }

    /// Clear the surfaced failure for `id`.
    ///
    /// # Returns
    /// `true` when a message was dismissed.
    pub fn dismiss_error(&mut self, id: &str) -> bool {
        self.errors.remove(id).is_some()
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        if self.sort == sort {
            return;
        }
        self.sort = sort;
        self.commit_change();
    }

    /// Replace the collection with a fresh backend listing.
    ///
    /// Records with an update in flight keep showing their optimistic patch
    /// until that update resolves.
    pub fn replace_all(&mut self, records: Vec<Snippet>) {
        self.records = records
            .into_iter()
            .map(|record| match self.in_flight.get(&record.id) {
                Some(pending) if pending.kind == MutationKind::Update => {
                    pending.patch.apply_to(&record)
                }
                _ => record,
            })
            .collect();
        self.errors
            .retain(|id, _| self.records.iter().any(|record| &record.id == id));
        tracing::debug!(count = self.records.len(), "snippet list replaced");
        self.commit_change();
    }

    /// Insert a newly created record, replacing any record with the same id.
    pub fn insert(&mut self, record: Snippet) {
        match self.position(&record.id) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
        self.commit_change();
    }

    /// Apply `patch` optimistically and open an update for `id`.
    ///
    /// # Returns
    /// The ticket to pass to [`SnippetList::resolve_update`] once the backend answers.
    ///
    /// # Errors
    /// A [`Rejection`] when the patch is empty or a no-op, sets a blank title,
    /// the record is unknown, or another mutation for it is in flight.
    pub fn begin_update(
        &mut self,
        id: &str,
        patch: SnippetPatch,
    ) -> Result<PendingMutation, Rejection> {
        if patch.is_empty() {
            return Err(Rejection::EmptyPatch);
        }
        if patch
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(Rejection::BlankTitle);
        }
        let index = self.position(id).ok_or(Rejection::UnknownRecord)?;
        if self.in_flight.contains_key(id) {
            tracing::debug!(id, "update ignored: mutation already in flight");
            return Err(Rejection::InFlight);
        }
        let previous = self.records[index].clone();
        if !patch.changes(&previous) {
            return Err(Rejection::Unchanged);
        }

        self.records[index] = patch.apply_to(&previous);
        let pending = PendingMutation {
            attempt: self.next_attempt(),
            record_id: id.to_string(),
            kind: MutationKind::Update,
            patch,
            previous,
        };
        self.in_flight.insert(id.to_string(), pending.clone());
        self.errors.remove(id);
        tracing::debug!(id, "optimistic update applied");
        self.commit_change();
        Ok(pending)
    }

    /// Settle an update with the backend's answer.
    ///
    /// A ticket that is not the current attempt for its record is discarded
    /// without touching any state.
    pub fn resolve_update(
        &mut self,
        pending: PendingMutation,
        result: Result<Option<Snippet>, ApiError>,
    ) -> UpdateOutcome {
        if !self.take_current(&pending) {
            return UpdateOutcome::Discarded;
        }
        let id = pending.record_id.clone();
        let Some(index) = self.position(&id) else {
            tracing::debug!(id = %id, "update resolved for a record no longer listed");
            return UpdateOutcome::Discarded;
        };

        let outcome = match result {
            Ok(server) => {
                let committed = match server {
                    Some(record) => {
                        if record.updated_at < pending.previous.updated_at {
                            tracing::warn!(id = %id, "backend returned an older updatedAt");
                        }
                        record
                    }
                    None => self.records[index].clone(),
                };
                self.records[index] = committed.clone();
                UpdateOutcome::Committed(committed)
            }
            Err(error) => {
                self.records[index] = pending.previous.clone();
                self.errors.insert(id.clone(), error.to_string());
                UpdateOutcome::RolledBack {
                    refresh_required: error.requires_refresh(),
                    error,
                }
            }
        };
        log_resolution(&pending, outcome.status());
        self.commit_change();
        outcome
    }

    /// Open a delete for `id`. The record stays visible until the backend confirms.
    ///
    /// # Errors
    /// [`Rejection::UnknownRecord`] or [`Rejection::InFlight`].
    pub fn begin_delete(&mut self, id: &str) -> Result<PendingMutation, Rejection> {
        let index = self.position(id).ok_or(Rejection::UnknownRecord)?;
        if self.in_flight.contains_key(id) {
            tracing::debug!(id, "delete ignored: mutation already in flight");
            return Err(Rejection::InFlight);
        }
        let pending = PendingMutation {
            attempt: self.next_attempt(),
            record_id: id.to_string(),
            kind: MutationKind::Delete,
            patch: SnippetPatch::default(),
            previous: self.records[index].clone(),
        };
        self.in_flight.insert(id.to_string(), pending.clone());
        self.errors.remove(id);
        Ok(pending)
    }

    /// Settle a delete. A 404 counts as deleted; a stale ticket is discarded.
    pub fn resolve_delete(
        &mut self,
        pending: PendingMutation,
        result: Result<(), ApiError>,
    ) -> DeleteOutcome {
        if !self.take_current(&pending) {
            return DeleteOutcome::Discarded;
        }
        let id = pending.record_id.clone();

        let outcome = match result {
            Ok(()) | Err(ApiError::NotFound) => {
                if let Some(index) = self.position(&id) {
                    self.records.remove(index);
                }
                self.errors.remove(&id);
                DeleteOutcome::Deleted
            }
            Err(error) => {
                if self.position(&id).is_some() {
                    self.errors.insert(id.clone(), error.to_string());
                }
                DeleteOutcome::Failed {
                    refresh_required: error.requires_refresh(),
                    error,
                }
            }
        };
        log_resolution(&pending, outcome.status());
        self.commit_change();
        outcome
    }

    /// Remove the in-flight entry for `pending` if it is the current attempt.
    fn take_current(&mut self, pending: &PendingMutation) -> bool {
        let current = self
            .in_flight
            .get(&pending.record_id)
            .map(|entry| entry.attempt);
        if current != Some(pending.attempt) {
            tracing::debug!(
                id = %pending.record_id,
                attempt = pending.attempt,
                "stale mutation ticket ignored"
            );
            return false;
        }
        self.in_flight.remove(&pending.record_id);
        true
    }

    fn next_attempt(&mut self) -> u64 {
        self.next_attempt += 1;
        self.next_attempt
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    fn commit_change(&mut self) {
        sort_in_place(&mut self.records, self.sort);
        self.revision += 1;
    }
}

fn log_resolution(pending: &PendingMutation, status: MutationStatus) {
    match status {
        MutationStatus::Failed => tracing::warn!(
            id = %pending.record_id,
            kind = ?pending.kind,
            attempt = pending.attempt,
            "mutation failed; local state restored"
        ),
        _ => tracing::debug!(
            id = %pending.record_id,
            kind = ?pending.kind,
            attempt = pending.attempt,
            status = ?status,
            "mutation resolved"
        ),
    }
}
