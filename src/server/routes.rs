//! REST handlers.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::codec::render_html;
use crate::remote::{list_pages as list_remote_pages, PageSummary};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::version(),
    })
}

#[derive(Debug, Deserialize)]
pub struct MarkdownPayload {
    markdown: String,
}

#[derive(Debug, Deserialize)]
pub struct PageSelection {
    page_id: String,
}

#[derive(Serialize)]
pub struct MarkdownResponse {
    markdown: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    markdown: Option<String>,
}

impl StatusResponse {
    fn ok() -> Self {
        Self {
            status: "ok",
            markdown: None,
        }
    }

    fn with_markdown(markdown: String) -> Self {
        Self {
            status: "ok",
            markdown: Some(markdown),
        }
    }
}

#[derive(Serialize)]
pub struct PagesResponse {
    status: &'static str,
    pages: Vec<PageSummary>,
}

pub async fn get_markdown(
    State(state): State<AppState>,
) -> Result<Json<MarkdownResponse>, ApiError> {
    let markdown = state.engine.load_initial().await?;
    Ok(Json(MarkdownResponse { markdown }))
}

pub async fn set_markdown(
    State(state): State<AppState>,
    Json(payload): Json<MarkdownPayload>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.engine.apply_update(&payload.markdown, true).await?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn preview(Json(payload): Json<MarkdownPayload>) -> Html<String> {
    Html(render_html(&payload.markdown))
}

pub async fn list_pages(State(state): State<AppState>) -> Result<Json<PagesResponse>, ApiError> {
    let Some(transport) = state.engine.transport() else {
        return Ok(Json(PagesResponse {
            status: "not_configured",
            pages: Vec::new(),
        }));
    };
    let pages = list_remote_pages(transport.as_ref())
        .await
        .map_err(crate::sync::SyncError::from)?;
    Ok(Json(PagesResponse {
        status: "ok",
        pages,
    }))
}

pub async fn select_page(
    State(state): State<AppState>,
    Json(payload): Json<PageSelection>,
) -> Result<Json<StatusResponse>, ApiError> {
    state.engine.select_remote(&payload.page_id).await?;
    let markdown = state.engine.pull_remote().await?;
    Ok(Json(StatusResponse::with_markdown(markdown)))
}

pub async fn pull(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let markdown = state.engine.pull_remote().await?;
    Ok(Json(StatusResponse::with_markdown(markdown)))
}
