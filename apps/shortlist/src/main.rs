mod backend_client;
mod config;
mod errors;
mod models;
mod routes;
mod shortlist;
mod state;
#[cfg(test)]
mod test_support;
mod workspace;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend_client::BackendClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::shortlist::render::Renderer;
use crate::state::AppState;
use crate::workspace::WorkspaceStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist web v{}", env!("CARGO_PKG_VERSION"));

    // Initialize backend client
    let backend = BackendClient::from_config(&config)?;
    info!(
        "Backend client initialized (base url: {}, timeout: {}s)",
        backend.base_url(),
        config.backend_timeout_secs
    );

    // Compile page fragment templates
    let renderer = Renderer::new()?;

    let state = AppState {
        backend: Arc::new(backend),
        workspaces: WorkspaceStore::new(config.workspace_idle_minutes, config.max_workspaces),
        renderer: Arc::new(renderer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the static page is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
