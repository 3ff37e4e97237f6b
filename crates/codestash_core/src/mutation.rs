//! Mutation records and their resolution outcomes.

use crate::error::ApiError;
use crate::models::snippet::{Snippet, SnippetPatch};

/// What a pending mutation does to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Update,
    Delete,
}

/// Lifecycle of one mutation attempt.
///
/// An attempt is [`MutationStatus::InFlight`] while [`crate::SnippetList::pending`]
/// holds its ticket; the settled status is reported by the resolution outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    InFlight,
    Succeeded,
    Failed,
}

/// Ticket for a mutation that has been applied locally and awaits the backend.
///
/// Issued by [`crate::SnippetList::begin_update`] or
/// [`crate::SnippetList::begin_delete`] and consumed by the matching resolve
/// call. Only the ticket of the current attempt for a record is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub(crate) attempt: u64,
    pub(crate) record_id: String,
    pub(crate) kind: MutationKind,
    pub(crate) patch: SnippetPatch,
    pub(crate) previous: Snippet,
}

impl PendingMutation {
    /// List-wide sequence number of this attempt.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn patch(&self) -> &SnippetPatch {
        &self.patch
    }

    /// Record as displayed before the optimistic change.
    pub fn previous(&self) -> &Snippet {
        &self.previous
    }
}

/// Result of resolving an update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The displayed record is final: the backend's copy, or the optimistic merge
    /// when the backend returned no body.
    Committed(Snippet),
    /// The previous snapshot was restored and `error` recorded for the record.
    RolledBack {
        error: ApiError,
        refresh_required: bool,
    },
    /// Nothing was applied: the record left the list while the request was in
    /// flight, or the ticket no longer belongs to the current attempt.
    Discarded,
}

/// Result of resolving a delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    /// The record stays in the list and `error` is recorded for it.
    Failed {
        error: ApiError,
        refresh_required: bool,
    },
    /// The ticket no longer belongs to the current attempt; nothing was applied.
    Discarded,
}

impl UpdateOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// Settled status of the attempt. A discarded resolution counts as failed.
    pub fn status(&self) -> MutationStatus {
        match self {
            Self::Committed(_) => MutationStatus::Succeeded,
            Self::RolledBack { .. } | Self::Discarded => MutationStatus::Failed,
        }
    }
}

impl DeleteOutcome {
    /// Settled status of the attempt. A discarded resolution counts as failed.
    pub fn status(&self) -> MutationStatus {
        match self {
            Self::Deleted => MutationStatus::Succeeded,
            Self::Failed { .. } | Self::Discarded => MutationStatus::Failed,
        }
    }
}
