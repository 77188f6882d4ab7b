//! HTTP and WebSocket surface over the sync engine.
//!
//! # Endpoints
//!
//! - `GET /health`: liveness and version
//! - `GET /api/markdown`: current document text
//! - `POST /api/markdown`: replace the document and push it to the remote
//! - `POST /api/preview`: render markdown to HTML
//! - `GET /api/pages`: pages available to the integration
//! - `POST /api/page`: switch the synced page and pull it
//! - `POST /api/pull`: pull the synced page now
//! - `GET /ws`: live document stream; text frames sent back are edits

mod routes;
mod ws;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::sync::{SubscriberHub, SyncEngine, SyncError};

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SyncEngine>,
    pub hub: Arc<SubscriberHub>,
}

impl AppState {
    pub fn new(engine: Arc<SyncEngine>, hub: Arc<SubscriberHub>) -> Self {
        Self { engine, hub }
    }
}

/// Builds the router with every endpoint.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/api/markdown",
            get(routes::get_markdown).post(routes::set_markdown),
        )
        .route("/api/preview", post(routes::preview))
        .route("/api/pages", get(routes::list_pages))
        .route("/api/page", post(routes::select_page))
        .route("/api/pull", post(routes::pull))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
}

/// Engine error as an HTTP response.
///
/// A missing remote is reported as a normal response with
/// `status: "not_configured"`; remote failures are 502, a pull overtaken by
/// a page switch 409 and local storage failures 500.
pub struct ApiError(SyncError);

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SyncError::NotConfigured => {
                return Json(json!({ "status": "not_configured" })).into_response();
            }
            SyncError::Remote(_) => StatusCode::BAD_GATEWAY,
            SyncError::TargetChanged(_) => StatusCode::CONFLICT,
            SyncError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!("Request failed: {}", self.0);
        (
            status,
            Json(json!({ "status": "error", "message": self.0.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::MockTransport;
    use crate::sync::{BroadcastSink, FileStore};
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    struct TestApp {
        _dir: TempDir,
        path: PathBuf,
        mock: MockTransport,
        state: AppState,
    }

    fn test_app(remote: Option<Option<&str>>) -> TestApp {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.md");
        let mock = MockTransport::new();
        let hub = Arc::new(SubscriberHub::new());
        let sink: Arc<dyn BroadcastSink> = hub.clone();
        let mut engine = SyncEngine::new(Arc::new(FileStore::new(&path)), sink);
        if let Some(document_id) = remote {
            engine = engine.with_remote(Arc::new(mock.clone()), document_id.map(str::to_string));
        }
        TestApp {
            _dir: dir,
            path,
            mock,
            state: AppState::new(Arc::new(engine), hub),
        }
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = build_router(app.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn paragraph(text: &str) -> Value {
        json!({ "type": "paragraph", "paragraph": { "rich_text": [{ "plain_text": text }] } })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(None);
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_get_markdown_reads_local_file() {
        let app = test_app(None);
        std::fs::write(&app.path, "# Local\n").unwrap();

        let (status, body) = get_json(&app, "/api/markdown").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["markdown"], "# Local\n");
    }

    #[tokio::test]
    async fn test_get_markdown_pulls_when_empty() {
        let app = test_app(Some(Some("doc")));
        app.mock.set_children("doc", vec![paragraph("from remote")]);

        let (_, body) = get_json(&app, "/api/markdown").await;
        assert_eq!(body["markdown"], "from remote\n");
        assert_eq!(std::fs::read_to_string(&app.path).unwrap(), "from remote\n");
    }

    #[tokio::test]
    async fn test_post_markdown_saves_and_pushes() {
        let app = test_app(Some(Some("doc")));

        let (status, body) =
            post_json(&app, "/api/markdown", json!({ "markdown": "- a\n- b\n" })).await;
        app.state.engine.wait_for_pushes().await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(std::fs::read_to_string(&app.path).unwrap(), "- a\n- b\n");
        assert_eq!(app.mock.children("doc").len(), 2);
    }

    #[tokio::test]
    async fn test_preview_returns_html() {
        let app = test_app(None);

        let (status, body) =
            post_json(&app, "/api/preview", json!({ "markdown": "# Hi\n- <b>\n" })).await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<li>&lt;b&gt;</li>"));
    }

    #[tokio::test]
    async fn test_pages_not_configured() {
        let app = test_app(None);
        let (status, body) = get_json(&app, "/api/pages").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "not_configured", "pages": [] }));
    }

    #[tokio::test]
    async fn test_pages_lists_directory() {
        let app = test_app(Some(None));
        app.mock.set_pages(vec![json!({
            "id": "p1",
            "parent": { "type": "workspace", "workspace": true },
            "properties": { "title": { "type": "title", "title": [{ "plain_text": "Inbox" }] } }
        })]);

        let (_, body) = get_json(&app, "/api/pages").await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["pages"][0]["id"], "p1");
        assert_eq!(body["pages"][0]["path"], "Inbox");
        assert_eq!(body["pages"][0]["depth"], 0);
    }

    #[tokio::test]
    async fn test_select_page_pulls_without_pushing() {
        let app = test_app(Some(None));
        app.mock.set_children("picked", vec![paragraph("picked text")]);

        let (status, body) = post_json(&app, "/api/page", json!({ "page_id": "picked" })).await;
        app.state.engine.wait_for_pushes().await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "status": "ok", "markdown": "picked text\n" }));
        assert_eq!(
            app.state.engine.remote_target().await.as_deref(),
            Some("picked")
        );
        assert_eq!(app.mock.append_count(), 0);
    }

    #[tokio::test]
    async fn test_select_page_not_configured() {
        let app = test_app(None);
        let (status, body) = post_json(&app, "/api/page", json!({ "page_id": "x" })).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "not_configured");
    }

    #[tokio::test]
    async fn test_pull_not_configured() {
        let app = test_app(Some(None));
        let (status, body) = post_json(&app, "/api/pull", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "not_configured");
    }

    #[tokio::test]
    async fn test_pull_remote_failure_is_bad_gateway() {
        let app = test_app(Some(Some("doc")));
        app.mock.fail_next_list("connection reset");

        let (status, body) = post_json(&app, "/api/pull", json!({})).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_pull_replaces_local_text() {
        let app = test_app(Some(Some("doc")));
        std::fs::write(&app.path, "stale\n").unwrap();
        app.mock.set_children("doc", vec![paragraph("fresh")]);

        let (_, body) = post_json(&app, "/api/pull", json!({})).await;

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["markdown"], "fresh\n");
        assert_eq!(std::fs::read_to_string(&app.path).unwrap(), "fresh\n");
    }
}
