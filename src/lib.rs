//! Keeps a local markdown file and a remote block document in step.
//!
//! - [`codec`] converts between markdown text and flat content blocks.
//! - [`remote`] pulls and full-replaces the remote document.
//! - [`sync`] owns the local copy, detects outside edits and fans changes
//!   out to subscribers.
//! - [`server`] exposes the engine over HTTP and WebSocket.

pub mod codec;
pub mod config;
pub mod remote;
pub mod server;
pub mod sync;

/// Crate version, as reported by `/health` and `--version`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
