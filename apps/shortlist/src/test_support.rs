//! In-memory [`TalentBackend`] for workspace and route tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::backend_client::{BackendError, ShortlistFetch, TalentBackend};
use crate::models::{AnalysisRequest, AnalysisResult, CandidateMatch, CandidateRecord};

pub fn candidate(name: &str, score: u32) -> CandidateMatch {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "match_score": score,
        "email": format!("{}@example.com", name.to_lowercase()),
        "years_experience": 4
    }))
    .unwrap()
}

/// Scripted answer for one job title.
#[derive(Debug, Clone)]
pub enum FakeShortlist {
    Ranked(Vec<CandidateMatch>),
    Empty(Option<String>),
    /// Behaves like a body that is not JSON.
    Transport,
}

pub struct FakeBackend {
    shortlists: HashMap<String, FakeShortlist>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    shortlist_calls: AtomicUsize,
    analysis_calls: AtomicUsize,
    analysis_fails: bool,
    analysis_score: u32,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            shortlists: HashMap::new(),
            gates: Mutex::new(HashMap::new()),
            shortlist_calls: AtomicUsize::new(0),
            analysis_calls: AtomicUsize::new(0),
            analysis_fails: false,
            analysis_score: 72,
        }
    }

    pub fn with_shortlist(mut self, job_title: &str, answer: FakeShortlist) -> Self {
        self.shortlists.insert(job_title.to_string(), answer);
        self
    }

    pub fn failing_analysis(mut self) -> Self {
        self.analysis_fails = true;
        self
    }

    /// Holds every fetch for `job_title` until the returned handle is notified.
    pub fn gate(&self, job_title: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(job_title.to_string(), notify.clone());
        notify
    }

    pub fn shortlist_calls(&self) -> usize {
        self.shortlist_calls.load(Ordering::SeqCst)
    }

    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    pub fn analysis_score(&self) -> u32 {
        self.analysis_score
    }
}

fn transport_error() -> BackendError {
    let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
    BackendError::Parse(err)
}

#[async_trait]
impl TalentBackend for FakeBackend {
    async fn fetch_shortlist(&self, job_title: &str) -> Result<ShortlistFetch, BackendError> {
        self.shortlist_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().unwrap().get(job_title).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.shortlists.get(job_title).cloned() {
            Some(FakeShortlist::Ranked(list)) => Ok(ShortlistFetch::Ranked(list)),
            Some(FakeShortlist::Empty(detail)) => Ok(ShortlistFetch::Empty { detail }),
            Some(FakeShortlist::Transport) => Err(transport_error()),
            None => Ok(ShortlistFetch::Empty { detail: None }),
        }
    }

    async fn analyze_candidate(
        &self,
        _request: &AnalysisRequest,
    ) -> Result<AnalysisResult, BackendError> {
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        if self.analysis_fails {
            return Err(BackendError::Api {
                status: 500,
                message: "Analysis failed".to_string(),
            });
        }
        Ok(AnalysisResult {
            analysis_id: Some("analysis-1".to_string()),
            match_score: self.analysis_score,
            key_matches: vec!["Rust".to_string()],
            gaps: vec![],
            suggestions: vec!["Add metrics".to_string()],
        })
    }

    async fn list_candidates(&self) -> Result<Vec<CandidateRecord>, BackendError> {
        Ok(vec![serde_json::from_value(serde_json::json!({
            "id": "c-1",
            "status": "active",
            "profile_data": { "name": "Ada Lovelace", "email": "ada@example.com" }
        }))
        .unwrap()])
    }
}
