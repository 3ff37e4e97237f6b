//! Async contract for the snippet REST backend.
//!
//! Implementations are injected into [`crate::SnippetSession`].

use crate::error::ApiError;
use crate::models::snippet::{Snippet, SnippetDraft, SnippetPatch};
use crate::query::ListQuery;
use std::future::Future;

/// CRUD operations exposed by the snippet backend.
pub trait SnippetApi: Send + Sync {
    /// List snippets matching `query`. An empty result is not an error.
    fn list(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Vec<Snippet>, ApiError>> + Send;

    /// Fetch one snippet. Unknown ids yield [`ApiError::NotFound`].
    fn get(&self, id: &str) -> impl Future<Output = Result<Snippet, ApiError>> + Send;

    /// Create a snippet; the backend assigns id and timestamps.
    fn create(
        &self,
        draft: &SnippetDraft,
    ) -> impl Future<Output = Result<Snippet, ApiError>> + Send;

    /// Apply a partial update.
    ///
    /// # Returns
    /// The backend's updated record, or `None` when the response carried no body.
    fn update(
        &self,
        id: &str,
        patch: &SnippetPatch,
    ) -> impl Future<Output = Result<Option<Snippet>, ApiError>> + Send;

    /// Delete a snippet.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// List every tag known to the backend.
    fn tags(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;
}
