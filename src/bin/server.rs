//! mdsync server
//!
//! Serves the local markdown file to browser editors, watches it for outside
//! edits and mirrors every change to a Notion page.
//!
//! # Configuration
//!
//! Read from `~/.config/mdsync/config.yaml` (or the path in `MDSYNC_CONFIG`),
//! overridden by environment variables:
//! - `MDSYNC_MARKDOWN_FILE`: markdown file to sync
//! - `MDSYNC_HOST`, `MDSYNC_PORT`: listen address (default: 127.0.0.1:8000)
//! - `MDSYNC_POLL_INTERVAL_MS`: file check period (default: 1000)
//! - `MDSYNC_NOTION_TOKEN`, `MDSYNC_NOTION_PAGE_ID`: remote page
//!
//! Without a token the server runs local-only.
//!
//! # Endpoints
//!
//! - `GET /health`: Health check
//! - `GET /api/markdown`, `POST /api/markdown`: read or replace the document
//! - `POST /api/preview`: render markdown to HTML
//! - `GET /api/pages`, `POST /api/page`: list pages, switch the synced page
//! - `POST /api/pull`: pull the synced page
//! - `GET /ws`: live document stream

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdsync::config::Config;
use mdsync::remote::NotionTransport;
use mdsync::server::{build_router, AppState};
use mdsync::sync::{BroadcastSink, FileStore, SubscriberHub, SyncEngine};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mdsync=info,mdsync_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(std::env::var("MDSYNC_CONFIG").ok().map(PathBuf::from))?;

    let markdown_file = config.markdown_file.value.clone();
    tracing::info!("Markdown file: {}", markdown_file.display());
    if let Some(path) = &config.config_file {
        tracing::info!("Config file: {}", path.display());
    }

    let hub = Arc::new(SubscriberHub::new());
    let sink: Arc<dyn BroadcastSink> = hub.clone();
    let mut engine = SyncEngine::new(Arc::new(FileStore::new(&markdown_file)), sink);

    match &config.remote.token {
        Some(token) => {
            let transport = NotionTransport::new(token.clone(), config.remote.api_url())?;
            engine = engine.with_remote(Arc::new(transport), config.remote.page_id.clone());
            match &config.remote.page_id {
                Some(page_id) => tracing::info!("Syncing with page {}", page_id),
                None => tracing::info!("No page selected; choose one through /api/page"),
            }
        }
        None => tracing::info!("Remote not configured, running local-only"),
    }

    let engine = Arc::new(engine);
    engine.seed().await?;
    engine.spawn_poll_loop(Duration::from_millis(config.poll_interval_ms.value.max(1)));

    let app = build_router(AppState::new(engine, hub)).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host.value, config.port.value);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;
    tracing::info!("Starting server on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
