//! Integration tests for the HTTP snippet client against an in-process backend.

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use codestash_cli::HttpSnippetApi;
use codestash_core::mutation::UpdateOutcome;
use codestash_core::session::MutationResult;
use codestash_core::{
    ApiError, ListQuery, SnippetApi, SnippetDraft, SnippetPatch, SnippetSession, SortDirection,
    SortField, SortSpec,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Backend {
    queries: Arc<Mutex<Vec<Option<String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

fn record(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "content": "fn main() {}",
        "language": "rust",
        "tags": ["cli"],
        "isFavorite": false,
        "createdAt": "2024-05-01T12:00:00Z",
        "updatedAt": "2024-05-01T12:00:00Z"
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Snippet not found" }))).into_response()
}

async fn list_snippets(State(backend): State<Backend>, RawQuery(query): RawQuery) -> Response {
    backend.queries.lock().expect("queries lock").push(query);
    Json(json!([record("1", "Zebra"), record("2", "apple")])).into_response()
}

async fn create_snippet(State(backend): State<Backend>, Json(body): Json<Value>) -> Response {
    backend.bodies.lock().expect("bodies lock").push(body.clone());
    let title = body["title"].as_str().unwrap_or_default();
    (StatusCode::CREATED, Json(record("new", title))).into_response()
}

async fn get_snippet(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1" => Json(record("1", "Zebra")).into_response(),
        _ => not_found(),
    }
}

async fn update_snippet(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    backend.bodies.lock().expect("bodies lock").push(body.clone());
    match id.as_str() {
        "empty" => StatusCode::NO_CONTENT.into_response(),
        "broken" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database unavailable" })),
        )
            .into_response(),
        "invalid" => (StatusCode::BAD_REQUEST, "title too long").into_response(),
        _ => {
            let mut updated = record(&id, "Zebra");
            if let Some(title) = body.get("title") {
                updated["title"] = title.clone();
            }
            updated["updatedAt"] = json!("2024-05-01T12:05:00Z");
            Json(updated).into_response()
        }
    }
}

async fn delete_snippet(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "gone" => not_found(),
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn list_tags() -> Json<Value> {
    Json(json!(["web", "CLI", "api"]))
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/v1/snippets", get(list_snippets).post(create_snippet))
        .route(
            "/api/v1/snippets/:id",
            get(get_snippet).put(update_snippet).delete(delete_snippet),
        )
        .route("/api/v1/tags", get(list_tags))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind backend");
    let addr = listener.local_addr().expect("backend addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve backend");
    });
    (format!("http://{}", addr), backend)
}

async fn client() -> (HttpSnippetApi, Backend) {
    let (server, backend) = spawn_backend().await;
    let api = HttpSnippetApi::new(&server, Duration::from_secs(5)).expect("client");
    (api, backend)
}

#[tokio::test]
async fn list_sends_search_and_repeated_tags() {
    let (api, backend) = client().await;
    let query = ListQuery::new("two words", vec!["c++".into(), "web".into()]);

    let records = api.list(&query).await.expect("list");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Zebra");

    api.list(&ListQuery::default()).await.expect("unfiltered list");
    let queries = backend.queries.lock().expect("queries lock").clone();
    assert_eq!(
        queries,
        vec![Some("q=two+words&tags=c%2B%2B&tags=web".to_string()), None]
    );
}

#[tokio::test]
async fn get_decodes_record_and_maps_404() {
    let (api, _backend) = client().await;

    let snippet = api.get("1").await.expect("get");
    assert_eq!(snippet.language, "rust");
    assert_eq!(
        snippet.created_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(api.get("missing").await, Err(ApiError::NotFound));
}

#[tokio::test]
async fn create_posts_camel_case_draft() {
    let (api, backend) = client().await;
    let draft = SnippetDraft {
        title: "Hello".into(),
        tags: vec!["demo".into()],
        is_favorite: true,
        ..SnippetDraft::default()
    };

    let created = api.create(&draft).await.expect("create");
    assert_eq!(created.id, "new");
    assert_eq!(created.title, "Hello");

    let bodies = backend.bodies.lock().expect("bodies lock").clone();
    assert_eq!(bodies[0]["isFavorite"], true);
    assert_eq!(bodies[0]["tags"], json!(["demo"]));
}

#[tokio::test]
async fn update_sends_only_present_fields() {
    let (api, backend) = client().await;

    let updated = api
        .update("1", &SnippetPatch::title("Renamed"))
        .await
        .expect("update");
    assert_eq!(updated.map(|snippet| snippet.title).as_deref(), Some("Renamed"));

    let bodies = backend.bodies.lock().expect("bodies lock").clone();
    assert_eq!(bodies, vec![json!({ "title": "Renamed" })]);
}

#[tokio::test]
async fn update_with_empty_body_yields_none() {
    let (api, _backend) = client().await;
    let updated = api
        .update("empty", &SnippetPatch::favorite(true))
        .await
        .expect("update");
    assert_eq!(updated, None);
}

#[tokio::test]
async fn failures_carry_status_and_message() {
    let (api, _backend) = client().await;

    let server_error = api
        .update("broken", &SnippetPatch::title("x"))
        .await
        .expect_err("server error");
    assert_eq!(
        server_error,
        ApiError::Status {
            status: 500,
            message: "database unavailable".into()
        }
    );
    assert!(server_error.requires_refresh());

    let client_error = api
        .update("invalid", &SnippetPatch::title("x"))
        .await
        .expect_err("client error");
    assert_eq!(client_error.status(), Some(400));
    assert!(!client_error.requires_refresh());
}

#[tokio::test]
async fn delete_accepts_empty_success_and_maps_404() {
    let (api, _backend) = client().await;
    assert_eq!(api.delete("1").await, Ok(()));
    assert_eq!(api.delete("gone").await, Err(ApiError::NotFound));
}

#[tokio::test]
async fn tags_are_decoded() {
    let (api, _backend) = client().await;
    assert_eq!(api.tags().await.expect("tags"), vec!["web", "CLI", "api"]);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpSnippetApi::new(&format!("http://{}", addr), Duration::from_secs(2))
        .expect("client");
    let err = api.list(&ListQuery::default()).await.expect_err("offline");
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.requires_refresh());
}

#[tokio::test]
async fn session_sorts_and_commits_over_http() {
    let (api, _backend) = client().await;
    let session = SnippetSession::new(
        api,
        SortSpec::new(SortField::Title, SortDirection::Ascending),
    );

    session.refresh().await.expect("refresh");
    let titles: Vec<String> = session
        .snapshot()
        .into_iter()
        .map(|snippet| snippet.title)
        .collect();
    assert_eq!(titles, vec!["apple".to_string(), "Zebra".to_string()]);

    let committed = match session.rename("2", "banana").await {
        MutationResult::Resolved(UpdateOutcome::Committed(committed)) => committed,
        other => panic!("expected committed update, got {:?}", other),
    };
    assert_eq!(committed.title, "banana");
    assert_eq!(session.get("2"), Some(committed));
}
