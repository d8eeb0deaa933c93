use std::sync::Arc;

use crate::backend_client::TalentBackend;
use crate::shortlist::render::Renderer;
use crate::workspace::WorkspaceStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume-analysis backend. `BackendClient` in production.
    pub backend: Arc<dyn TalentBackend>,
    pub workspaces: WorkspaceStore,
    pub renderer: Arc<Renderer>,
}
