//! Remote block document access.
//!
//! The remote service stores a page as a flat list of typed blocks. This
//! module narrows its JSON shapes into [`ContentBlock`](crate::codec::ContentBlock)s,
//! drives pagination and batching, and provides the HTTP transport.
//!
//! # Transport
//!
//! [`RemoteTransport`] is the seam between document logic and the wire. The
//! production implementation is [`NotionTransport`]; tests use an in-memory
//! mock.

mod client;
mod error;
mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod pages;
pub mod wire;

pub use client::{PushReport, RemoteDocumentClient, APPEND_BATCH_LIMIT};
pub use error::RemoteError;
pub use http::{NotionTransport, DEFAULT_API_URL, NOTION_VERSION};
pub use pages::{list_pages, PageSummary};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Raw operations against the remote service.
///
/// Implementations return JSON records as the service sends them; callers
/// narrow them. Every method fails with a [`RemoteError`] rather than
/// panicking.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Lists one page of the children of `block_id`.
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ListPage, RemoteError>;

    /// Deletes a single block.
    async fn delete_block(&self, block_id: &str) -> Result<(), RemoteError>;

    /// Appends `children` to the end of `block_id`, in order.
    async fn append_children(&self, block_id: &str, children: Vec<Value>)
        -> Result<(), RemoteError>;

    /// Lists one page of the pages visible to the integration.
    async fn search_pages(&self, cursor: Option<&str>) -> Result<ListPage, RemoteError>;
}
