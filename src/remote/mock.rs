//! In-memory remote for testing.
//!
//! Holds the children of every document in memory, paginates listings and
//! records every call so tests can assert on the exact request sequence.

use super::{ListPage, RemoteError, RemoteTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// A call made against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List {
        block_id: String,
        cursor: Option<String>,
    },
    Delete(String),
    Append {
        block_id: String,
        count: usize,
    },
    Search {
        cursor: Option<String>,
    },
}

#[derive(Debug)]
struct MockInner {
    documents: HashMap<String, Vec<Value>>,
    pages: Vec<Value>,
    page_size: usize,
    next_id: usize,
    calls: Vec<Call>,
    fail_deletes: HashSet<String>,
    fail_next_list: Option<String>,
    fail_next_append: Option<String>,
}

/// Mock transport. Clones share state.
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                documents: HashMap::new(),
                pages: Vec::new(),
                page_size: 100,
                next_id: 0,
                calls: Vec::new(),
                fail_deletes: HashSet::new(),
                fail_next_list: None,
                fail_next_append: None,
            })),
        }
    }

    /// Sets how many records a single listing page returns.
    pub fn with_page_size(self, page_size: usize) -> Self {
        self.inner.lock().unwrap().page_size = page_size;
        self
    }

    /// Replaces the children of a document, assigning ids where missing.
    pub fn set_children(&self, block_id: &str, children: Vec<Value>) {
        let mut inner = self.inner.lock().unwrap();
        let children = children
            .into_iter()
            .map(|child| inner.with_id(child))
            .collect();
        inner.documents.insert(block_id.to_string(), children);
    }

    /// Current children of a document.
    pub fn children(&self, block_id: &str) -> Vec<Value> {
        let inner = self.inner.lock().unwrap();
        inner.documents.get(block_id).cloned().unwrap_or_default()
    }

    pub fn set_pages(&self, pages: Vec<Value>) {
        self.inner.lock().unwrap().pages = pages;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn append_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Append { .. }))
            .count()
    }

    /// Makes every delete of `block_id` fail.
    pub fn fail_delete(&self, block_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_deletes.insert(block_id.to_string());
    }

    pub fn fail_next_list(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_list = Some(error.to_string());
    }

    pub fn fail_next_append(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_append = Some(error.to_string());
    }
}

impl MockInner {
    fn with_id(&mut self, mut child: Value) -> Value {
        if child.get("id").is_none() {
            self.next_id += 1;
            child["id"] = json!(format!("block-{}", self.next_id));
        }
        child
    }

    fn page(&self, items: &[Value], cursor: Option<&str>) -> ListPage {
        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        let has_more = end < items.len();
        ListPage {
            results: items[start.min(end)..end].to_vec(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        }
    }
}

#[async_trait]
impl RemoteTransport for MockTransport {
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ListPage, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::List {
            block_id: block_id.to_string(),
            cursor: cursor.map(str::to_string),
        });
        if let Some(error) = inner.fail_next_list.take() {
            return Err(RemoteError::Unavailable(error));
        }
        let children = inner.documents.get(block_id).cloned().unwrap_or_default();
        Ok(inner.page(&children, cursor))
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Delete(block_id.to_string()));
        if inner.fail_deletes.contains(block_id) {
            return Err(RemoteError::Api {
                status: 409,
                message: format!("cannot delete {}", block_id),
            });
        }
        for children in inner.documents.values_mut() {
            children.retain(|child| child.get("id").and_then(Value::as_str) != Some(block_id));
        }
        Ok(())
    }

    async fn append_children(
        &self,
        block_id: &str,
        children: Vec<Value>,
    ) -> Result<(), RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Append {
            block_id: block_id.to_string(),
            count: children.len(),
        });
        if let Some(error) = inner.fail_next_append.take() {
            return Err(RemoteError::Unavailable(error));
        }
        let children: Vec<Value> = children
            .into_iter()
            .map(|child| inner.with_id(child))
            .collect();
        inner
            .documents
            .entry(block_id.to_string())
            .or_default()
            .extend(children);
        Ok(())
    }

    async fn search_pages(&self, cursor: Option<&str>) -> Result<ListPage, RemoteError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Search {
            cursor: cursor.map(str::to_string),
        });
        let pages = inner.pages.clone();
        Ok(inner.page(&pages, cursor))
    }
}
