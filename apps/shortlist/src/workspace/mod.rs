//! Workspaces: the per-tab state of one reviewer.
//!
//! A workspace holds the job title produced by the analysis step and one
//! [`ReviewSession`]. The job title is handed to the shortlist load
//! explicitly; nothing else reads it.
//!
//! The store lock is never held across a backend call. A load takes a ticket
//! under the lock, releases it for the request, and re-acquires it to apply
//! the outcome; superseded outcomes are dropped by the session.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend_client::{BackendError, ShortlistFetch, TalentBackend};
use crate::errors::AppError;
use crate::models::{AnalysisRequest, AnalysisResult};
use crate::shortlist::session::{LoadOutcome, ReviewSession, ReviewState};

const MAX_IDLE_MINUTES: i64 = 60 * 24 * 30;

/// Shown in the page when the backend could not be reached or answered with
/// something other than JSON. The cause is only logged.
pub const TRANSPORT_FAILURE: &str = "Could not load candidates from the analysis service";

#[derive(Debug)]
pub struct Workspace {
    pub id: Uuid,
    pub job_title: Option<String>,
    pub review: ReviewSession,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Workspace {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_title: None,
            review: ReviewSession::new(),
            created_at: now,
            last_seen: now,
        }
    }
}

/// In-memory workspace registry shared by all handlers.
#[derive(Clone)]
pub struct WorkspaceStore {
    inner: Arc<RwLock<HashMap<Uuid, Workspace>>>,
    idle_timeout: Duration,
    max_open: usize,
}

impl WorkspaceStore {
    pub fn new(idle_minutes: i64, max_open: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Duration::minutes(idle_minutes.clamp(1, MAX_IDLE_MINUTES)),
            max_open: max_open.max(1),
        }
    }

    /// Opens a workspace for a new tab visit. Idle workspaces are swept first;
    /// at the `max_open` limit the least recently seen workspaces are evicted.
    pub async fn create(&self) -> Uuid {
        let now = Utc::now();
        let mut map = self.inner.write().await;

        let cutoff = now - self.idle_timeout;
        let before = map.len();
        map.retain(|_, ws| ws.last_seen >= cutoff);
        let swept = before - map.len();
        if swept > 0 {
            info!(swept, "Swept idle workspaces");
        }

        while map.len() >= self.max_open {
            let oldest = map
                .values()
                .min_by_key(|ws| ws.last_seen)
                .map(|ws| ws.id);
            match oldest {
                Some(oldest) => {
                    map.remove(&oldest);
                    warn!(
                        workspace_id = %oldest,
                        limit = self.max_open,
                        "Evicted least recently seen workspace"
                    );
                }
                None => break,
            }
        }

        let workspace = Workspace::new(now);
        let id = workspace.id;
        map.insert(id, workspace);
        debug!(workspace_id = %id, open = map.len(), "Workspace created");
        id
    }

    /// Discards a workspace and everything reviewed in it.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.inner.write().await.remove(&id);
        match removed {
            Some(ws) => {
                let age = Utc::now() - ws.created_at;
                debug!(
                    workspace_id = %id,
                    age_secs = age.num_seconds(),
                    accepted = ws.review.accepted().len(),
                    "Workspace discarded"
                );
                true
            }
            None => false,
        }
    }

    /// Runs `f` against the workspace under the write lock and marks it as seen.
    pub async fn with_mut<R, F>(&self, id: Uuid, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Workspace) -> R,
    {
        let mut map = self.inner.write().await;
        let workspace = map
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Workspace {id} not found")))?;
        workspace.last_seen = Utc::now();
        Ok(f(workspace))
    }
}

/// Runs the job-match analysis and, on success only, makes its job title the
/// workspace's shortlist job title.
pub async fn record_analysis(
    store: &WorkspaceStore,
    backend: &dyn TalentBackend,
    id: Uuid,
    request: AnalysisRequest,
) -> Result<(AnalysisResult, String), AppError> {
    let request = AnalysisRequest {
        candidate_id: request.candidate_id.trim().to_string(),
        job_title: request.job_title.trim().to_string(),
        job_location: request.job_location.trim().to_string(),
    };
    if request.candidate_id.is_empty() {
        return Err(AppError::Validation("Please select a candidate".to_string()));
    }
    if !is_candidate_id(&request.candidate_id) {
        return Err(AppError::Validation("Unknown candidate id".to_string()));
    }
    if request.job_title.is_empty() {
        return Err(AppError::Validation("Please provide a job title".to_string()));
    }
    if request.job_location.is_empty() {
        return Err(AppError::Validation("Please provide a job location".to_string()));
    }

    // 404 before spending a backend call on a closed tab.
    store.with_mut(id, |_| ()).await?;

    let result = backend.analyze_candidate(&request).await?;

    let job_title = request.job_title;
    store
        .with_mut(id, |ws| ws.job_title = Some(job_title.clone()))
        .await?;
    info!(
        workspace_id = %id,
        job_title = %job_title,
        match_score = result.match_score,
        "Analysis recorded"
    );
    Ok((result, job_title))
}

/// Loads the ranked shortlist for the workspace's job title.
///
/// Without a job title this refuses with [`AppError::MissingPrerequisite`]
/// and sends nothing. Transport failures become the session's `Error` state.
/// If another load or a reset happened meanwhile, returns
/// [`AppError::StaleLoad`] and leaves the session as the newer request left it.
pub async fn load_shortlist(
    store: &WorkspaceStore,
    backend: &dyn TalentBackend,
    id: Uuid,
) -> Result<ReviewState, AppError> {
    let (job_title, ticket) = store
        .with_mut(id, |ws| {
            let job_title = ws
                .job_title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    AppError::MissingPrerequisite(
                        "No job title set. Analyze a candidate against a job title first"
                            .to_string(),
                    )
                })?;
            let ticket = ws.review.begin_load(&job_title);
            Ok::<_, AppError>((job_title, ticket))
        })
        .await??;

    info!(workspace_id = %id, job_title = %job_title, ticket = ticket.value(), "Loading shortlist");
    let outcome = outcome_from(backend.fetch_shortlist(&job_title).await);

    let applied = store
        .with_mut(id, |ws| ws.review.finish_load(ticket, outcome).cloned())
        .await?;

    match applied {
        Ok(state) => {
            info!(workspace_id = %id, state = state.as_str(), "Shortlist load applied");
            Ok(state)
        }
        Err(stale) => {
            warn!(workspace_id = %id, "Discarding stale shortlist response: {stale}");
            Err(AppError::StaleLoad)
        }
    }
}

/// Backend ids are UUIDs or slugs; anything that could be read as a path or
/// query fragment is refused before it reaches the backend client.
fn is_candidate_id(id: &str) -> bool {
    id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn outcome_from(result: Result<ShortlistFetch, BackendError>) -> LoadOutcome {
    match result {
        Ok(ShortlistFetch::Ranked(candidates)) => LoadOutcome::Ranked(candidates),
        Ok(ShortlistFetch::Empty { detail }) => LoadOutcome::Empty { detail },
        Err(e) => {
            warn!("Shortlist fetch failed: {e}");
            LoadOutcome::Failed {
                message: TRANSPORT_FAILURE.to_string(),
            }
        }
    }
}
