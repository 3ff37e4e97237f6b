//! Shared test-only helpers for codestash_core.

use crate::api::SnippetApi;
use crate::error::ApiError;
use crate::models::snippet::{Snippet, SnippetDraft, SnippetPatch};
use crate::query::ListQuery;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Fixed base instant so fixtures stay deterministic.
pub(crate) fn t(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid fixture instant")
        + Duration::seconds(offset_secs)
}

/// Builds a snippet fixture with predictable defaults.
pub(crate) fn snippet(id: &str, title: &str) -> Snippet {
    Snippet {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        content: String::new(),
        language: "rust".to_string(),
        tags: Vec::new(),
        is_favorite: false,
        created_at: t(0),
        updated_at: t(0),
    }
}

/// Builds a snippet fixture with a random id.
pub(crate) fn snippet_with_random_id(title: &str) -> Snippet {
    snippet(&uuid::Uuid::new_v4().to_string(), title)
}

/// Scripted in-memory backend.
///
/// Queued results are consumed in call order; without a queued result each call
/// answers like a well-behaved server. An installed gate parks the next update
/// until it is released.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    pub(crate) records: Mutex<Vec<Snippet>>,
    pub(crate) tags: Mutex<Vec<String>>,
    update_results: Mutex<VecDeque<Result<Option<Snippet>, ApiError>>>,
    delete_results: Mutex<VecDeque<Result<(), ApiError>>>,
    list_results: Mutex<VecDeque<Result<Vec<Snippet>, ApiError>>>,
    update_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub(crate) fn with_records(records: Vec<Snippet>) -> Self {
        let api = Self::default();
        *api.records.lock().expect("records lock") = records;
        api
    }

    pub(crate) fn push_update_result(&self, result: Result<Option<Snippet>, ApiError>) {
        self.update_results
            .lock()
            .expect("update results lock")
            .push_back(result);
    }

    pub(crate) fn push_delete_result(&self, result: Result<(), ApiError>) {
        self.delete_results
            .lock()
            .expect("delete results lock")
            .push_back(result);
    }

    pub(crate) fn push_list_result(&self, result: Result<Vec<Snippet>, ApiError>) {
        self.list_results
            .lock()
            .expect("list results lock")
            .push_back(result);
    }

    /// Park the next update call until the returned sender fires.
    pub(crate) fn gate_next_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.update_gate.lock().expect("gate lock") = Some(rx);
        tx
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn count_calls(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl SnippetApi for ScriptedApi {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Snippet>, ApiError> {
        self.record(format!("list {}", query.to_query_string()));
        if let Some(result) = self.list_results.lock().expect("list lock").pop_front() {
            return result;
        }
        Ok(self.records.lock().expect("records lock").clone())
    }

    async fn get(&self, id: &str) -> Result<Snippet, ApiError> {
        self.record(format!("get {}", id));
        self.records
            .lock()
            .expect("records lock")
            .iter()
            .find(|snippet| snippet.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create(&self, draft: &SnippetDraft) -> Result<Snippet, ApiError> {
        self.record(format!("create {}", draft.title));
        let created = Snippet {
            id: format!("created-{}", draft.title),
            title: draft.title.clone(),
            description: draft.description.clone(),
            content: draft.content.clone(),
            language: draft.language.clone(),
            tags: draft.tags.clone(),
            is_favorite: draft.is_favorite,
            created_at: t(100),
            updated_at: t(100),
        };
        self.records
            .lock()
            .expect("records lock")
            .push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: &SnippetPatch) -> Result<Option<Snippet>, ApiError> {
        self.record(format!("update {}", id));
        let gate = self.update_gate.lock().expect("gate lock").take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(result) = self.update_results.lock().expect("update lock").pop_front() {
            return result;
        }
        let mut records = self.records.lock().expect("records lock");
        let Some(existing) = records.iter_mut().find(|snippet| snippet.id == id) else {
            return Err(ApiError::NotFound);
        };
        let mut updated = patch.apply_to(existing);
        updated.updated_at = existing.updated_at + Duration::seconds(1);
        *existing = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete {}", id));
        if let Some(result) = self.delete_results.lock().expect("delete lock").pop_front() {
            return result;
        }
        self.records
            .lock()
            .expect("records lock")
            .retain(|snippet| snippet.id != id);
        Ok(())
    }

    async fn tags(&self) -> Result<Vec<String>, ApiError> {
        self.record("tags".to_string());
        Ok(self.tags.lock().expect("tags lock").clone())
    }
}
