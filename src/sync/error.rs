//! Sync engine error types.

use super::store::StoreError;
use crate::remote::RemoteError;

/// Errors surfaced by the sync engine.
#[derive(Debug)]
pub enum SyncError {
    /// No remote credentials or target document are configured
    NotConfigured,
    /// Remote pull or push failed
    Remote(RemoteError),
    /// Another document was selected while a pull was in flight
    TargetChanged(String),
    /// Reading or writing the local copy failed
    Store(StoreError),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::NotConfigured => write!(
                f,
                "Remote not configured. Set remote.token and remote.page_id in config."
            ),
            SyncError::Remote(e) => write!(f, "{}", e),
            SyncError::TargetChanged(id) => write!(
                f,
                "Remote document {} was deselected during the pull",
                id
            ),
            SyncError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::NotConfigured | SyncError::TargetChanged(_) => None,
            SyncError::Remote(e) => Some(e),
            SyncError::Store(e) => Some(e),
        }
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        SyncError::Remote(e)
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Store(e)
    }
}
