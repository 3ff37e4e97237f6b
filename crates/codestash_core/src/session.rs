//! Async orchestration of the list store against an API.
//!
//! A session pairs an injected [`SnippetApi`] with the [`SnippetList`]. The
//! list lock is only held between awaits, so updates for different records can
//! be in flight at once while each record sees at most one.

use crate::api::SnippetApi;
use crate::error::{ApiError, Rejection};
use crate::list::SnippetList;
use crate::models::snippet::{Snippet, SnippetDraft, SnippetPatch};
use crate::mutation::{DeleteOutcome, UpdateOutcome};
use crate::picker::{MultiSelect, Picker};
use crate::query::ListQuery;
use crate::sort::{locale_cmp, SortSpec};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of a session-level update or delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult<T> {
    /// The request never reached the backend.
    Skipped(Rejection),
    /// The backend answered and the list has been reconciled.
    Resolved(T),
}

impl<T> MutationResult<T> {
    pub fn resolved(self) -> Option<T> {
        match self {
            Self::Resolved(outcome) => Some(outcome),
            Self::Skipped(_) => None,
        }
    }
}

/// Snippet list bound to a backend.
pub struct SnippetSession<A> {
    api: A,
    list: Mutex<SnippetList>,
    query: Mutex<ListQuery>,
}

impl<A: SnippetApi> SnippetSession<A> {
    pub fn new(api: A, sort: SortSpec) -> Self {
        Self {
            api,
            list: Mutex::new(SnippetList::new(sort)),
            query: Mutex::new(ListQuery::default()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn list(&self) -> MutexGuard<'_, SnippetList> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn query_guard(&self) -> MutexGuard<'_, ListQuery> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records in display order.
    pub fn snapshot(&self) -> Vec<Snippet> {
        self.list().view().to_vec()
    }

    pub fn get(&self, id: &str) -> Option<Snippet> {
        self.list().get(id).cloned()
    }

    pub fn revision(&self) -> u64 {
        self.list().revision()
    }

    pub fn sort(&self) -> SortSpec {
        self.list().sort()
    }

    pub fn set_sort(&self, sort: SortSpec) {
        self.list().set_sort(sort);
    }

    pub fn error_for(&self, id: &str) -> Option<String> {
        self.list().error_for(id).map(str::to_string)
    }

    pub fn dismiss_error(&self, id: &str) -> bool {
        self.list().dismiss_error(id)
    }

    pub fn query(&self) -> ListQuery {
        self.query_guard().clone()
    }

    /// Set the search text used by the next [`SnippetSession::refresh`].
    pub fn set_search(&self, search: impl Into<String>) {
        self.query_guard().set_search(search);
    }

    /// Toggle `tag` in the filter used by the next [`SnippetSession::refresh`].
    pub fn toggle_tag(&self, tag: &str) -> bool {
        self.query_guard().toggle_tag(tag)
    }

    /// Re-fetch the list for the current query. A 404 is treated as an empty result.
    ///
    /// # Returns
    /// The number of records now listed.
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let query = self.query();
        let records = match self.api.list(&query).await {
            Ok(records) => records,
            Err(ApiError::NotFound) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "snippet list fetch failed");
                return Err(err);
            }
        };
        let mut list = self.list();
        list.replace_all(records);
        Ok(list.len())
    }

    /// Fetch one record from the backend and add or refresh its listed copy.
    ///
    /// A record with a mutation in flight keeps its optimistic state.
    pub async fn fetch(&self, id: &str) -> Result<Snippet, ApiError> {
        let record = self.api.get(id).await?;
        let mut list = self.list();
        if !list.is_in_flight(id) {
            list.insert(record.clone());
        }
        Ok(record)
    }

    /// Create a record and add the backend's copy to the list.
    pub async fn create(&self, draft: &SnippetDraft) -> Result<Snippet, ApiError> {
        let created = self.api.create(draft).await?;
        tracing::debug!(id = %created.id, "snippet created");
        self.list().insert(created.clone());
        Ok(created)
    }

    /// Optimistically apply `patch` to `id` and reconcile with the backend.
    ///
    /// The displayed record changes before the request is sent. A failure
    /// restores the previous record; a 5xx failure also re-fetches the list.
    pub async fn update(&self, id: &str, patch: SnippetPatch) -> MutationResult<UpdateOutcome> {
        let pending = match self.list().begin_update(id, patch) {
            Ok(pending) => pending,
            Err(rejection) => return MutationResult::Skipped(rejection),
        };

        let result = self.api.update(id, pending.patch()).await;
        let outcome = self.list().resolve_update(pending, result);

        if let UpdateOutcome::RolledBack {
            refresh_required: true,
            ..
        } = outcome
        {
            self.refresh_after_failure().await;
        }
        MutationResult::Resolved(outcome)
    }

    /// Delete `id` once the backend confirms. A 5xx failure re-fetches the list.
    pub async fn delete(&self, id: &str) -> MutationResult<DeleteOutcome> {
        let pending = match self.list().begin_delete(id) {
            Ok(pending) => pending,
            Err(rejection) => return MutationResult::Skipped(rejection),
        };

        let result = self.api.delete(id).await;
        let outcome = self.list().resolve_delete(pending, result);

        if let DeleteOutcome::Failed {
            refresh_required: true,
            ..
        } = outcome
        {
            self.refresh_after_failure().await;
        }
        MutationResult::Resolved(outcome)
    }

    /// Set the title of `id`.
    pub async fn rename(&self, id: &str, title: &str) -> MutationResult<UpdateOutcome> {
        self.update(id, SnippetPatch::title(title)).await
    }

    /// Save edited content for `id`.
    pub async fn save_content(&self, id: &str, content: &str) -> MutationResult<UpdateOutcome> {
        self.update(id, SnippetPatch::content(content)).await
    }

    /// Flip the favorite flag of `id`.
    pub async fn toggle_favorite(&self, id: &str) -> MutationResult<UpdateOutcome> {
        let current = self.list().get(id).map(|record| record.is_favorite);
        match current {
            Some(is_favorite) => self.update(id, SnippetPatch::favorite(!is_favorite)).await,
            None => MutationResult::Skipped(Rejection::UnknownRecord),
        }
    }

    /// Fetch all known tags in display order.
    pub async fn load_tags(&self) -> Result<Vec<String>, ApiError> {
        let mut tags = self.api.tags().await?;
        tags.sort_by(|a, b| locale_cmp(a, b));
        tags.dedup();
        Ok(tags)
    }

    /// Build a tag picker over the backend's tags, preselecting the current filter.
    pub async fn tag_picker(&self) -> Result<Picker<MultiSelect>, ApiError> {
        let tags = self.load_tags().await?;
        let selection = self.query_guard().tag_selection().clone();
        Ok(Picker::new(tags, selection))
    }

    /// Adopt the selection of a tag picker as the list filter.
    pub fn apply_tag_picker(&self, picker: Picker<MultiSelect>) {
        self.query_guard().set_tags(picker.into_selection());
    }

    async fn refresh_after_failure(&self) {
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "re-fetch after server error failed");
        }
    }
}
