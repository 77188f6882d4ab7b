//! Directory of pages available to the integration.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{RemoteError, RemoteTransport};

/// Title used for pages without one.
pub const UNTITLED: &str = "(untitled)";
/// Path prefix for pages whose parent isn't visible.
pub const OUTSIDE_WORKSPACE: &str = "(outside workspace)";

/// A page that can be selected as the sync target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub title: String,
    /// Titles from the outermost visible ancestor down, joined with ` / `
    pub path: String,
    /// Number of visible ancestors
    pub depth: usize,
    pub parent_id: Option<String>,
    pub parent_type: Option<String>,
}

struct RawPage {
    title: String,
    parent_id: Option<String>,
    parent_type: Option<String>,
}

/// Lists every page the transport can see, sorted by path.
pub async fn list_pages(transport: &dyn RemoteTransport) -> Result<Vec<PageSummary>, RemoteError> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = transport.search_pages(cursor.as_deref()).await?;
        records.extend(page.results);
        match (page.has_more, page.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            _ => break,
        }
    }

    let mut order = Vec::new();
    let mut pages: HashMap<String, RawPage> = HashMap::new();
    for record in &records {
        let Some(id) = record.get("id").and_then(Value::as_str) else {
            continue;
        };
        let parent = record.get("parent");
        let raw = RawPage {
            title: page_title(record),
            parent_id: parent
                .and_then(|p| p.get("page_id"))
                .and_then(Value::as_str)
                .map(str::to_string),
            parent_type: parent
                .and_then(|p| p.get("type"))
                .and_then(Value::as_str)
                .map(str::to_string),
        };
        if pages.insert(id.to_string(), raw).is_none() {
            order.push(id.to_string());
        }
    }

    let mut summaries: Vec<PageSummary> = order
        .iter()
        .map(|id| {
            let (path, depth) = build_path(id, &pages);
            let page = &pages[id];
            PageSummary {
                id: id.clone(),
                title: page.title.clone(),
                path,
                depth,
                parent_id: page.parent_id.clone(),
                parent_type: page.parent_type.clone(),
            }
        })
        .collect();
    summaries.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!("Listed {} page(s)", summaries.len());
    Ok(summaries)
}

/// Walks parent links upward, stopping at the first parent that isn't in
/// the listing.
fn build_path(id: &str, pages: &HashMap<String, RawPage>) -> (String, usize) {
    let mut titles = Vec::new();
    let mut depth = 0;
    let mut current = id;

    loop {
        let Some(page) = pages.get(current) else {
            break;
        };
        titles.push(page.title.as_str());
        let Some(parent_id) = page.parent_id.as_deref() else {
            break;
        };
        if !pages.contains_key(parent_id) {
            titles.push(OUTSIDE_WORKSPACE);
            break;
        }
        // parent cycles would otherwise never terminate
        if depth >= pages.len() {
            break;
        }
        depth += 1;
        current = parent_id;
    }

    titles.reverse();
    (titles.join(" / "), depth)
}

/// Text of the first `title` property, or [`UNTITLED`].
fn page_title(record: &Value) -> String {
    let Some(properties) = record.get("properties").and_then(Value::as_object) else {
        return UNTITLED.to_string();
    };
    for property in properties.values() {
        if property.get("type").and_then(Value::as_str) != Some("title") {
            continue;
        }
        let title: String = property
            .get("title")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        item.get("plain_text")
                            .and_then(Value::as_str)
                            .or_else(|| item.pointer("/text/content").and_then(Value::as_str))
                    })
                    .collect()
            })
            .unwrap_or_default();
        let title = title.trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }
    UNTITLED.to_string()
}
