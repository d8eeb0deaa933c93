//! Axum route handlers for workspaces and the analysis step.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{AnalysisRequest, AnalysisResult, CandidateRecord, ScoreBand};
use crate::state::AppState;
use crate::workspace::record_analysis;

#[derive(Debug, Serialize)]
pub struct WorkspaceCreatedResponse {
    pub workspace_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisResult,
    pub band: ScoreBand,
    pub label: &'static str,
    pub job_title: String,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub candidates: Vec<CandidateRecord>,
    pub total: usize,
}

/// POST /api/v1/workspaces
pub async fn handle_create_workspace(
    State(state): State<AppState>,
) -> (StatusCode, Json<WorkspaceCreatedResponse>) {
    let workspace_id = state.workspaces.create().await;
    (
        StatusCode::CREATED,
        Json(WorkspaceCreatedResponse { workspace_id }),
    )
}

/// DELETE /api/v1/workspaces/:id
pub async fn handle_delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.workspaces.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Workspace {id} not found")))
    }
}

/// POST /api/v1/workspaces/:id/analysis
///
/// Analyzes one candidate against a job title. On success the job title
/// becomes the one the shortlist tab loads with.
pub async fn handle_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let (analysis, job_title) =
        record_analysis(&state.workspaces, state.backend.as_ref(), id, request).await?;

    let band = ScoreBand::from_score(analysis.match_score);
    let html = state.renderer.analysis(&analysis, &job_title)?;

    Ok(Json(AnalysisResponse {
        analysis,
        band,
        label: band.label(),
        job_title,
        html,
    }))
}

/// GET /api/v1/candidates
///
/// Uploaded candidates, for choosing an analysis target.
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let candidates = state.backend.list_candidates().await?;
    Ok(Json(CandidateListResponse {
        total: candidates.len(),
        candidates,
    }))
}
