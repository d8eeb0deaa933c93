//! Axum route handlers for the shortlist tab.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::shortlist::session::{Decision, ReviewSession};
use crate::shortlist::ReviewView;
use crate::state::AppState;
use crate::workspace::load_shortlist;

/// GET /api/v1/workspaces/:id/shortlist
pub async fn handle_get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    let view = state
        .workspaces
        .with_mut(id, |ws| ReviewView::build(ws, &state.renderer, None))
        .await??;
    Ok(Json(view))
}

/// POST /api/v1/workspaces/:id/shortlist/open
///
/// The tab was (re)opened: any queue, decisions or in-flight load are dropped.
pub async fn handle_open(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    let view = state
        .workspaces
        .with_mut(id, |ws| {
            ws.review.reset();
            ReviewView::build(ws, &state.renderer, None)
        })
        .await??;
    Ok(Json(view))
}

/// POST /api/v1/workspaces/:id/shortlist/load
pub async fn handle_load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    load_shortlist(&state.workspaces, state.backend.as_ref(), id).await?;
    handle_get_review(State(state), Path(id)).await
}

/// POST /api/v1/workspaces/:id/shortlist/accept
pub async fn handle_accept(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    decide(&state, id, ReviewSession::accept).await
}

/// POST /api/v1/workspaces/:id/shortlist/reject
pub async fn handle_reject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    decide(&state, id, ReviewSession::reject).await
}

async fn decide(
    state: &AppState,
    id: Uuid,
    action: fn(&mut ReviewSession) -> Decision,
) -> Result<Json<ReviewView>, AppError> {
    let view = state
        .workspaces
        .with_mut(id, |ws| {
            let decision = action(&mut ws.review);
            debug!(
                workspace_id = %id,
                ?decision,
                cursor = ws.review.cursor(),
                accepted = ws.review.accepted().len(),
                "Shortlist decision"
            );
            ReviewView::build(ws, &state.renderer, Some(decision))
        })
        .await??;
    Ok(Json(view))
}
