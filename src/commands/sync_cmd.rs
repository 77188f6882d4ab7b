//! One-shot pull and push against the configured page.

use std::sync::Arc;

use mdsync::config::Config;
use mdsync::remote::{NotionTransport, RemoteDocumentClient};
use mdsync::sync::{DocumentStore, FileStore, SyncError};

/// Builds a client for the configured page, or fails with `NotConfigured`.
fn document_client(config: &Config) -> Result<RemoteDocumentClient, SyncError> {
    let (Some(token), Some(page_id)) = (&config.remote.token, &config.remote.page_id) else {
        return Err(SyncError::NotConfigured);
    };
    let transport = NotionTransport::new(token.clone(), config.remote.api_url())?;
    Ok(RemoteDocumentClient::new(Arc::new(transport), page_id.clone()))
}

/// Overwrites the markdown file with the remote page.
pub async fn pull(config: &Config) -> Result<(), SyncError> {
    let client = document_client(config)?;
    let store = FileStore::new(&config.markdown_file.value);

    let text = client.pull_text().await?;
    store.write(&text).await?;

    println!(
        "Pulled page {} into {} ({} line(s))",
        client.document_id(),
        store.path().display(),
        text.lines().count()
    );
    Ok(())
}

/// Replaces the remote page with the markdown file.
pub async fn push(config: &Config) -> Result<(), SyncError> {
    let client = document_client(config)?;
    let store = FileStore::new(&config.markdown_file.value);

    let text = store.read().await?.unwrap_or_default();
    let report = client.push_text(&text).await?;

    println!(
        "Pushed {} block(s) to page {} ({} removed)",
        report.appended,
        client.document_id(),
        report.deleted
    );
    if report.delete_failures > 0 {
        println!(
            "Warning: {} existing block(s) could not be removed",
            report.delete_failures
        );
    }
    Ok(())
}
