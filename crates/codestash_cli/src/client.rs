//! HTTP implementation of [`SnippetApi`] on top of `reqwest`.

use codestash_core::constants::{SNIPPETS_PATH, TAGS_PATH};
use codestash_core::{ApiError, ListQuery, Snippet, SnippetApi, SnippetDraft, SnippetPatch};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Snippet backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSnippetApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpSnippetApi {
    /// Build a client for `server` with a per-request `timeout`.
    ///
    /// # Errors
    /// [`ApiError::Transport`] when the URL cannot serve as an API base or the
    /// HTTP client cannot be constructed.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Self::with_client(client, server)
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client, server: &str) -> Result<Self, ApiError> {
        let base = parse_base(server)?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        join_segments(&self.base, segments)
    }

    fn snippet_endpoint(&self, id: &str) -> Result<Url, ApiError> {
        let mut segments = SNIPPETS_PATH.to_vec();
        segments.push(id);
        self.endpoint(&segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let res = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        ensure_success(res).await
    }
}

impl SnippetApi for HttpSnippetApi {
    async fn list(&self, query: &ListQuery) -> Result<Vec<Snippet>, ApiError> {
        let mut url = self.endpoint(SNIPPETS_PATH)?;
        let encoded = query.to_query_string();
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }
        tracing::debug!(url = %url, "listing snippets");
        let res = self.send(self.client.get(url)).await?;
        decode_json(res).await
    }

    async fn get(&self, id: &str) -> Result<Snippet, ApiError> {
        let url = self.snippet_endpoint(id)?;
        let res = self.send(self.client.get(url)).await?;
        decode_json(res).await
    }

    async fn create(&self, draft: &SnippetDraft) -> Result<Snippet, ApiError> {
        let url = self.endpoint(SNIPPETS_PATH)?;
        let res = self.send(self.client.post(url).json(draft)).await?;
        decode_json(res).await
    }

    async fn update(&self, id: &str, patch: &SnippetPatch) -> Result<Option<Snippet>, ApiError> {
        let url = self.snippet_endpoint(id)?;
        let res = self.send(self.client.put(url).json(patch)).await?;
        let body = res
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.snippet_endpoint(id)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn tags(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(TAGS_PATH)?;
        let res = self.send(self.client.get(url)).await?;
        decode_json(res).await
    }
}

async fn ensure_success(res: Response) -> Result<Response, ApiError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = rejection_message(status, &body);
    tracing::debug!(status = status.as_u16(), %message, "request rejected");
    Err(ApiError::from_status(status.as_u16(), message))
}

async fn decode_json<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let body = res
        .bytes()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Message reported for a rejected request.
///
/// A JSON body contributes its `error` (or `message`) string; any other
/// non-blank body is reported as is. Without a body the status line is used.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return match status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => format!("HTTP {}", status.as_u16()),
        };
    }
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
    });
    from_json.unwrap_or_else(|| body.to_string())
}

/// Parse the configured server into a base URL that paths can be appended to.
fn parse_base(server: &str) -> Result<Url, ApiError> {
    let base = Url::parse(server)
        .map_err(|err| ApiError::Transport(format!("invalid server URL '{}': {}", server, err)))?;
    if base.cannot_be_a_base() {
        return Err(ApiError::Transport(format!(
            "server URL '{}' cannot be used as an API base",
            server
        )));
    }
    Ok(base)
}

/// Append percent-encoded `segments` below the path of `base`.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::Transport(format!("cannot append a path to '{}'", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Server string without surrounding whitespace or trailing slashes.
pub fn trim_server(server: &str) -> &str {
    server.trim().trim_end_matches('/')
}
