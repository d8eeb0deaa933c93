pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::shortlist::handlers as shortlist;
use crate::state::AppState;
use crate::workspace::handlers as workspace;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/candidates", get(workspace::handle_list_candidates))
        // Workspaces (one per browser tab)
        .route("/api/v1/workspaces", post(workspace::handle_create_workspace))
        .route(
            "/api/v1/workspaces/:id",
            delete(workspace::handle_delete_workspace),
        )
        .route(
            "/api/v1/workspaces/:id/analysis",
            post(workspace::handle_analysis),
        )
        // Shortlist review
        .route(
            "/api/v1/workspaces/:id/shortlist",
            get(shortlist::handle_get_review),
        )
        .route(
            "/api/v1/workspaces/:id/shortlist/open",
            post(shortlist::handle_open),
        )
        .route(
            "/api/v1/workspaces/:id/shortlist/load",
            post(shortlist::handle_load),
        )
        .route(
            "/api/v1/workspaces/:id/shortlist/accept",
            post(shortlist::handle_accept),
        )
        .route(
            "/api/v1/workspaces/:id/shortlist/reject",
            post(shortlist::handle_reject),
        )
        .with_state(state)
}
