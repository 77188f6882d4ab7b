//! Fan-out of document text to live subscribers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Messages a subscriber may have queued before it counts as stalled.
pub const SUBSCRIBER_BUFFER: usize = 16;

/// Receives every accepted version of the document.
#[async_trait]
pub trait BroadcastSink: Send + Sync {
    /// Delivers `text` to every live subscriber. Never fails; delivery
    /// problems are handled per subscriber.
    async fn broadcast(&self, text: &str);
}

pub type SubscriberId = u64;

/// A live subscription handed to a connected viewer.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub receiver: mpsc::Receiver<String>,
}

/// Tracks connected subscribers.
///
/// A subscriber that has gone away, or has fallen [`SUBSCRIBER_BUFFER`]
/// messages behind, is dropped on the next broadcast. Its receiver then
/// yields `None`, which ends the session holding it.
#[derive(Debug, Default)]
pub struct SubscriberHub {
    subscribers: RwLock<HashMap<SubscriberId, mpsc::Sender<String>>>,
    next_id: AtomicU64,
}

impl SubscriberHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub async fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_BUFFER);

        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(id, sender);
        tracing::info!("Subscriber {} connected ({} live)", id, subscribers.len());

        Subscription { id, receiver }
    }

    /// Removes a subscriber; unknown ids are ignored.
    pub async fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(&id).is_some() {
            tracing::info!(
                "Subscriber {} disconnected ({} live)",
                id,
                subscribers.len()
            );
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

#[async_trait]
impl BroadcastSink for SubscriberHub {
    async fn broadcast(&self, text: &str) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.retain(|id, sender| match sender.try_send(text.to_string()) {
            Ok(()) => true,
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Pruning closed subscriber {}", id);
                false
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Pruning stalled subscriber {}", id);
                false
            }
        });
        tracing::debug!(
            "Broadcast {} byte(s) to {} subscriber(s)",
            text.len(),
            subscribers.len()
        );
    }
}
