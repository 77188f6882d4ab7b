//! Synchronization between the local document, the remote page and live
//! subscribers.
//!
//! All mutations go through [`SyncEngine::apply_update`], which persists the
//! text, records its fingerprint, optionally queues a remote push and
//! broadcasts to subscribers. A poll loop compares the stored text against
//! the last fingerprint to pick up edits made outside the engine.

mod engine;
mod error;
pub mod fingerprint;
pub mod hub;
pub mod push;
pub mod store;

pub use engine::SyncEngine;
pub use error::SyncError;
pub use fingerprint::Fingerprint;
pub use hub::{BroadcastSink, SubscriberHub, SubscriberId, Subscription};
pub use push::PushQueue;
pub use store::{DocumentStore, FileStore, StoreError};
