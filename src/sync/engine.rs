//! Sync engine: the single writer of the local document.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::error::SyncError;
use super::fingerprint::Fingerprint;
use super::hub::BroadcastSink;
use super::push::PushQueue;
use super::store::DocumentStore;
use crate::remote::{RemoteDocumentClient, RemoteTransport};

#[derive(Debug, Default)]
struct EngineState {
    /// Fingerprint of the last text committed or observed in the store.
    last_seen: Option<Fingerprint>,
}

/// Owns the authoritative document text and keeps the store, the remote
/// page and subscribers in step.
///
/// Every mutation is serialized through one lock. Remote pushes are handed
/// to a background [`PushQueue`], so a slow remote never delays a commit,
/// a broadcast or the next poll tick.
pub struct SyncEngine {
    store: Arc<dyn DocumentStore>,
    sink: Arc<dyn BroadcastSink>,
    transport: Option<Arc<dyn RemoteTransport>>,
    target: RwLock<Option<Arc<RemoteDocumentClient>>>,
    state: Mutex<EngineState>,
    pushes: PushQueue,
}

impl SyncEngine {
    /// Creates a local-only engine. Must be called from within a Tokio
    /// runtime, since it starts the push worker.
    pub fn new(store: Arc<dyn DocumentStore>, sink: Arc<dyn BroadcastSink>) -> Self {
        Self {
            store,
            sink,
            transport: None,
            target: RwLock::new(None),
            state: Mutex::new(EngineState::default()),
            pushes: PushQueue::spawn(),
        }
    }

    /// Attaches a remote. Without a `document_id` the page directory and
    /// [`select_remote`](Self::select_remote) work, but nothing is pushed
    /// until a page is selected.
    pub fn with_remote(
        mut self,
        transport: Arc<dyn RemoteTransport>,
        document_id: Option<String>,
    ) -> Self {
        let target = document_id.map(|id| Arc::new(RemoteDocumentClient::new(transport.clone(), id)));
        self.target = RwLock::new(target);
        self.transport = Some(transport);
        self
    }

    /// The remote transport, if one is attached.
    pub fn transport(&self) -> Option<Arc<dyn RemoteTransport>> {
        self.transport.clone()
    }

    /// Id of the remote document currently synced, if any.
    pub async fn remote_target(&self) -> Option<String> {
        self.target
            .read()
            .await
            .as_ref()
            .map(|client| client.document_id().to_string())
    }

    pub async fn last_seen_fingerprint(&self) -> Option<Fingerprint> {
        self.state.lock().await.last_seen
    }

    /// Reads the stored text; a missing store reads as empty.
    pub async fn current_text(&self) -> Result<String, SyncError> {
        Ok(self.store.read().await?.unwrap_or_default())
    }

    /// Records the fingerprint of the stored text without pushing or
    /// broadcasting it, so the first poll tick does not treat the existing
    /// file as an edit.
    pub async fn seed(&self) -> Result<(), SyncError> {
        let mut state = self.state.lock().await;
        let text = self.current_text().await?;
        let fingerprint = Fingerprint::of(&text);
        tracing::debug!("Seeded fingerprint {}", fingerprint);
        state.last_seen = Some(fingerprint);
        Ok(())
    }

    /// Commits `text` as the new document.
    ///
    /// The text is persisted and fingerprinted, queued for a remote push
    /// when `push_remote` is set and a target is selected, then broadcast.
    /// A failed push is logged by the push worker and never fails this call.
    pub async fn apply_update(&self, text: &str, push_remote: bool) -> Result<(), SyncError> {
        let mut state = self.state.lock().await;
        self.commit(&mut state, text, push_remote, true).await
    }

    /// Checks the store for an edit made outside the engine.
    ///
    /// Returns `true` when a change was detected and committed. A failed
    /// read counts as no change. The first tick on an unseeded engine only
    /// records the fingerprint.
    pub async fn poll_tick(&self) -> bool {
        let mut state = self.state.lock().await;

        let text = match self.store.read().await {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Poll skipped: {}", e);
                return false;
            }
        };
        let fingerprint = Fingerprint::of(&text);

        match state.last_seen {
            None => {
                state.last_seen = Some(fingerprint);
                false
            }
            Some(seen) if seen == fingerprint => false,
            Some(_) => {
                tracing::info!("Detected external change ({})", fingerprint);
                // the text came from the store, so it is not written back
                match self.commit(&mut state, &text, true, false).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!("Failed to commit external change: {}", e);
                        false
                    }
                }
            }
        }
    }

    /// Points the engine at another remote document.
    ///
    /// A push still pending for the previous document is dropped. Nothing
    /// is pulled; callers follow up with [`pull_remote`](Self::pull_remote).
    pub async fn select_remote(&self, document_id: &str) -> Result<(), SyncError> {
        let transport = self.transport.clone().ok_or(SyncError::NotConfigured)?;

        let mut target = self.target.write().await;
        self.pushes.discard_pending();
        *target = Some(Arc::new(RemoteDocumentClient::new(transport, document_id)));
        tracing::info!("Selected remote document {}", document_id);
        Ok(())
    }

    /// Pulls the selected remote document and commits it without pushing
    /// it back. Returns the pulled text.
    ///
    /// Pushes already queued are finished first, so the pull never reads a
    /// document that is behind the local copy. If another document is
    /// selected while the pull runs, nothing is committed.
    pub async fn pull_remote(&self) -> Result<String, SyncError> {
        let client = self
            .target
            .read()
            .await
            .clone()
            .ok_or(SyncError::NotConfigured)?;

        self.pushes.wait_idle().await;
        let text = client.pull_text().await?;
        tracing::info!("Pulled {} byte(s) from {}", text.len(), client.document_id());

        let mut state = self.state.lock().await;
        let current = self.remote_target().await;
        if current.as_deref() != Some(client.document_id()) {
            tracing::warn!(
                "Dropped pull of {}, selection changed to {:?}",
                client.document_id(),
                current
            );
            return Err(SyncError::TargetChanged(client.document_id().to_string()));
        }
        self.commit(&mut state, &text, false, true).await?;
        Ok(text)
    }

    /// Text to show a newly connected viewer.
    ///
    /// The stored text, unless it is blank and a remote document is
    /// selected, in which case the remote is pulled and committed.
    pub async fn load_initial(&self) -> Result<String, SyncError> {
        let text = self.current_text().await?;
        if !text.trim().is_empty() || self.target.read().await.is_none() {
            return Ok(text);
        }
        self.pull_remote().await
    }

    /// Runs [`poll_tick`](Self::poll_tick) every `period` until the runtime
    /// shuts down. Ticks missed while one is running are skipped.
    pub fn spawn_poll_loop(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                engine.poll_tick().await;
            }
        })
    }

    /// Waits until every push queued so far has completed or been skipped.
    pub async fn wait_for_pushes(&self) {
        self.pushes.wait_idle().await;
    }

    async fn commit(
        &self,
        state: &mut EngineState,
        text: &str,
        push_remote: bool,
        write_store: bool,
    ) -> Result<(), SyncError> {
        if write_store {
            self.store.write(text).await?;
        }
        state.last_seen = Some(Fingerprint::of(text));

        if push_remote {
            if let Some(client) = self.target.read().await.clone() {
                self.pushes.submit(client, text.to_string());
            }
        }

        self.sink.broadcast(text).await;
        Ok(())
    }
}
