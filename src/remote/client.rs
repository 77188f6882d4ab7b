//! Whole-document pull and push against one remote page.

use serde_json::Value;
use std::sync::Arc;

use super::error::RemoteError;
use super::wire::{block_id, block_to_remote, narrow_block};
use super::RemoteTransport;
use crate::codec::{decode, encode, ContentBlock};

/// Most children the service accepts in one append request.
pub const APPEND_BATCH_LIMIT: usize = 100;

/// Outcome of a full-replace push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Existing blocks that were deleted
    pub deleted: usize,
    /// Existing blocks whose delete failed and were left in place
    pub delete_failures: usize,
    /// Blocks appended
    pub appended: usize,
    /// Number of append requests issued
    pub batches: usize,
}

/// Reads and replaces the content of a single remote document.
#[derive(Clone)]
pub struct RemoteDocumentClient {
    transport: Arc<dyn RemoteTransport>,
    document_id: String,
}

impl std::fmt::Debug for RemoteDocumentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDocumentClient")
            .field("document_id", &self.document_id)
            .finish()
    }
}

impl RemoteDocumentClient {
    pub fn new(transport: Arc<dyn RemoteTransport>, document_id: impl Into<String>) -> Self {
        Self {
            transport,
            document_id: document_id.into(),
        }
    }

    /// Returns the remote document id.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Fetches every block of the document, in remote order.
    ///
    /// Blocks the codec does not model are skipped; modeled blocks with an
    /// unexpected payload are kept with empty text.
    pub async fn pull(&self) -> Result<Vec<ContentBlock>, RemoteError> {
        let records = self.list_all().await?;
        let mut blocks = Vec::with_capacity(records.len());

        for record in &records {
            match narrow_block(record) {
                Ok(block) => blocks.push(block),
                Err(malformed) => {
                    tracing::warn!("Skipping remote {}", malformed);
                    blocks.extend(malformed.placeholder());
                }
            }
        }

        tracing::debug!(
            "Pulled {} block(s) from {} ({} record(s) listed)",
            blocks.len(),
            self.document_id,
            records.len()
        );
        Ok(blocks)
    }

    /// Pulls the document and renders it as markdown.
    pub async fn pull_text(&self) -> Result<String, RemoteError> {
        Ok(decode(&self.pull().await?))
    }

    /// Replaces the whole document with `blocks`.
    ///
    /// Every existing block is deleted first; a failed delete is logged and
    /// the rest continue. The new blocks are then appended in order, in
    /// batches of at most [`APPEND_BATCH_LIMIT`]. This is not atomic: a
    /// failure part way leaves the document partially written.
    pub async fn push(&self, blocks: &[ContentBlock]) -> Result<PushReport, RemoteError> {
        let mut report = PushReport::default();

        for record in self.list_all().await? {
            let Some(id) = block_id(&record) else {
                continue;
            };
            match self.transport.delete_block(id).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!("Failed to delete block {}: {}", id, e);
                    report.delete_failures += 1;
                }
            }
        }

        for batch in blocks.chunks(APPEND_BATCH_LIMIT) {
            let children: Vec<Value> = batch.iter().map(block_to_remote).collect();
            self.transport
                .append_children(&self.document_id, children)
                .await?;
            report.appended += batch.len();
            report.batches += 1;
        }

        tracing::debug!(
            "Pushed {} block(s) to {} in {} batch(es), deleted {}",
            report.appended,
            self.document_id,
            report.batches,
            report.deleted
        );
        Ok(report)
    }

    /// Encodes markdown and replaces the document with it.
    pub async fn push_text(&self, text: &str) -> Result<PushReport, RemoteError> {
        self.push(&encode(text)).await
    }

    /// Drains the cursor-paginated child listing.
    async fn list_all(&self) -> Result<Vec<Value>, RemoteError> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .transport
                .list_children(&self.document_id, cursor.as_deref())
                .await?;
            results.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(results)
    }
}
