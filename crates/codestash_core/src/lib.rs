//! Core client library for Code Stash (models, sorting, list state, API contract).

/// Async contract for the snippet REST backend.
pub mod api;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across Code Stash crates.
pub mod constants;
/// Error types for API calls, rejected mutations, and configuration.
pub mod error;
/// Canonical snippet collection and optimistic mutation bookkeeping.
pub mod list;
/// Data models for records and API payloads.
pub mod models;
/// Mutation records and their resolution outcomes.
pub mod mutation;
/// Headless selectable-list popover state.
pub mod picker;
/// List query parameters and query-string encoding.
pub mod query;
/// Async orchestration of the list store against an API.
pub mod session;
/// Field-driven record comparison and stable sorting.
pub mod sort;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::SnippetApi;
pub use config::Config;
pub use constants::{DEFAULT_PORT, DEFAULT_SERVER_URL};
pub use error::{ApiError, FailureClass, Rejection};
pub use list::SnippetList;
pub use models::snippet::{Snippet, SnippetDraft, SnippetPatch};
pub use query::ListQuery;
pub use session::SnippetSession;
pub use sort::{SortDirection, SortField, SortSpec};
