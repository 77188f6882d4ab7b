//! Background remote pushes.
//!
//! Pushes run on one worker task so a slow remote never holds up local
//! commits or broadcasts. Only the newest pending text is kept: if several
//! updates arrive while a push is in flight, the intermediate ones are
//! skipped and only the latest is pushed next.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::remote::RemoteDocumentClient;

#[derive(Clone)]
enum Slot {
    /// Nothing pending; every submission up to `through` is resolved.
    Idle { through: u64 },
    Job {
        seq: u64,
        client: Arc<RemoteDocumentClient>,
        text: String,
    },
}

/// Latest-wins push queue served by a single worker.
pub struct PushQueue {
    pending: watch::Sender<Slot>,
    resolved: watch::Receiver<u64>,
    submitted: AtomicU64,
}

impl PushQueue {
    /// Starts the worker. Must be called from within a Tokio runtime.
    pub fn spawn() -> Self {
        let (pending, mut slots) = watch::channel(Slot::Idle { through: 0 });
        let (resolved_tx, resolved) = watch::channel(0u64);

        tokio::spawn(async move {
            while slots.changed().await.is_ok() {
                let slot = slots.borrow_and_update().clone();
                let through = match slot {
                    Slot::Idle { through } => through,
                    Slot::Job { seq, client, text } => {
                        match client.push_text(&text).await {
                            Ok(report) => tracing::info!(
                                "Pushed {} block(s) to {}",
                                report.appended,
                                client.document_id()
                            ),
                            Err(e) => tracing::warn!(
                                "Push to {} failed, remote is behind local: {}",
                                client.document_id(),
                                e
                            ),
                        }
                        seq
                    }
                };
                resolved_tx.send_if_modified(|current| {
                    if through > *current {
                        *current = through;
                        true
                    } else {
                        false
                    }
                });
            }
        });

        Self {
            pending,
            resolved,
            submitted: AtomicU64::new(0),
        }
    }

    /// Queues `text` to replace the content of `client`'s document,
    /// superseding anything not yet started.
    pub fn submit(&self, client: Arc<RemoteDocumentClient>, text: String) {
        let seq = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.send_replace(Slot::Job { seq, client, text });
    }

    /// Drops the pending push, if any. A push already running completes.
    pub fn discard_pending(&self) {
        let through = self.submitted.load(Ordering::SeqCst);
        self.pending.send_replace(Slot::Idle { through });
    }

    /// Waits until every push submitted so far has run or been skipped.
    pub async fn wait_idle(&self) {
        let target = self.submitted.load(Ordering::SeqCst);
        let mut resolved = self.resolved.clone();
        let _ = resolved.wait_for(|done| *done >= target).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::MockTransport;

    #[tokio::test]
    async fn test_latest_text_wins() {
        let mock = MockTransport::new();
        let client = Arc::new(RemoteDocumentClient::new(Arc::new(mock.clone()), "doc"));
        let queue = PushQueue::spawn();

        for i in 0..5 {
            queue.submit(client.clone(), format!("version {}\n", i));
        }
        queue.wait_idle().await;

        assert_eq!(client.pull_text().await.unwrap(), "version 4\n");
        assert!(mock.append_count() <= 5);
    }

    #[tokio::test]
    async fn test_discard_pending_resolves_waiters() {
        let mock = MockTransport::new();
        let client = Arc::new(RemoteDocumentClient::new(Arc::new(mock.clone()), "doc"));
        let queue = PushQueue::spawn();

        queue.submit(client, "never mind\n".to_string());
        queue.discard_pending();
        queue.wait_idle().await;
    }

    #[tokio::test]
    async fn test_wait_idle_with_nothing_submitted() {
        let queue = PushQueue::spawn();
        queue.wait_idle().await;
    }
}
