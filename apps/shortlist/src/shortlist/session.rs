//! Review session — one linear accept/reject pass over a ranked queue.
//!
//! # States
//! - `Idle`: nothing loaded (fresh, reset, or a load is in flight)
//! - `Reviewing`: `cursor < queue.len()`, `current()` is the candidate on screen
//! - `Exhausted`: every candidate decided; terminal until the next load
//! - `Empty` / `Error`: terminal outcomes of a load attempt
//!
//! Decisions are final: the cursor never moves back and accepted candidates
//! are never removed or reordered. Every load takes a [`LoadTicket`]; only
//! the most recently issued ticket may apply its outcome.

use serde::Serialize;
use thiserror::Error;

use crate::models::CandidateMatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Idle,
    Reviewing,
    Exhausted,
    Empty { detail: Option<String> },
    Error { message: String },
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Idle => "idle",
            ReviewState::Reviewing => "reviewing",
            ReviewState::Exhausted => "exhausted",
            ReviewState::Empty { .. } => "empty",
            ReviewState::Error { .. } => "error",
        }
    }
}

/// Result of a retrieval, ready to be applied to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Ranked(Vec<CandidateMatch>),
    Empty { detail: Option<String> },
    Failed { message: String },
}

/// Token identifying one load attempt. Issued by [`ReviewSession::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("load ticket {ticket} was superseded by ticket {latest}")]
pub struct StaleTicket {
    pub ticket: u64,
    pub latest: u64,
}

/// What a single accept/reject did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Cursor moved on; another candidate is up for review.
    Advanced,
    /// This decision consumed the last candidate: Reviewing → Exhausted.
    Finished,
    /// Not reviewing; nothing changed.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    queue: Vec<CandidateMatch>,
    cursor: usize,
    accepted: Vec<CandidateMatch>,
    state: ReviewState,
    job_title: Option<String>,
    latest_ticket: u64,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            cursor: 0,
            accepted: Vec::new(),
            state: ReviewState::Idle,
            job_title: None,
            latest_ticket: 0,
        }
    }

    /// Back to `Idle` with nothing loaded. Any load still in flight becomes stale.
    pub fn reset(&mut self) {
        self.clear();
        self.job_title = None;
        self.latest_ticket += 1;
    }

    /// Starts a load for `job_title`: discards the previous queue and
    /// decisions unconditionally and issues a fresh ticket.
    pub fn begin_load(&mut self, job_title: &str) -> LoadTicket {
        self.clear();
        self.job_title = Some(job_title.to_string());
        self.latest_ticket += 1;
        LoadTicket(self.latest_ticket)
    }

    /// Applies the outcome of the load identified by `ticket`.
    /// Outcomes of superseded loads are dropped without touching the session.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: LoadOutcome,
    ) -> Result<&ReviewState, StaleTicket> {
        if ticket.0 != self.latest_ticket {
            return Err(StaleTicket {
                ticket: ticket.0,
                latest: self.latest_ticket,
            });
        }

        self.clear();
        self.state = match outcome {
            LoadOutcome::Ranked(queue) if queue.is_empty() => ReviewState::Empty { detail: None },
            LoadOutcome::Ranked(queue) => {
                self.queue = queue;
                ReviewState::Reviewing
            }
            LoadOutcome::Empty { detail } => ReviewState::Empty { detail },
            LoadOutcome::Failed { message } => ReviewState::Error { message },
        };
        Ok(&self.state)
    }

    pub fn current(&self) -> Option<&CandidateMatch> {
        match self.state {
            ReviewState::Reviewing => self.queue.get(self.cursor),
            _ => None,
        }
    }

    pub fn accept(&mut self) -> Decision {
        let Some(candidate) = self.current().cloned() else {
            return Decision::Ignored;
        };
        self.accepted.push(candidate);
        self.advance()
    }

    pub fn reject(&mut self) -> Decision {
        if self.current().is_none() {
            return Decision::Ignored;
        }
        self.advance()
    }

    /// True when no candidate is left to decide on, including when nothing
    /// was loaded at all.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Accepted candidates in decision order.
    pub fn accepted(&self) -> &[CandidateMatch] {
        &self.accepted
    }

    /// The job title of the most recent load, if any.
    pub fn job_title(&self) -> Option<&str> {
        self.job_title.as_deref()
    }

    fn advance(&mut self) -> Decision {
        self.cursor += 1;
        if self.cursor >= self.queue.len() {
            self.state = ReviewState::Exhausted;
            Decision::Finished
        } else {
            Decision::Advanced
        }
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.accepted.clear();
        self.cursor = 0;
        self.state = ReviewState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: u32) -> CandidateMatch {
        serde_json::from_value(serde_json::json!({ "name": name, "match_score": score })).unwrap()
    }

    fn loaded(job_title: &str, candidates: Vec<CandidateMatch>) -> ReviewSession {
        let mut session = ReviewSession::new();
        let ticket = session.begin_load(job_title);
        session
            .finish_load(ticket, LoadOutcome::Ranked(candidates))
            .unwrap();
        session
    }

    fn names(list: &[CandidateMatch]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    fn assert_invariants(session: &ReviewSession) {
        assert!(session.cursor() <= session.queue_len());
        assert!(session.accepted().len() <= session.cursor());
    }

    #[test]
    fn test_new_session_is_idle_and_inert() {
        let mut session = ReviewSession::new();
        assert_eq!(session.state(), &ReviewState::Idle);
        assert!(session.current().is_none());
        assert!(session.is_exhausted());
        assert_eq!(session.accept(), Decision::Ignored);
        assert_eq!(session.reject(), Decision::Ignored);
        assert_eq!(session.cursor(), 0);
        assert!(session.accepted().is_empty());
    }

    #[test]
    fn test_accept_reject_reject_walkthrough() {
        let mut session = loaded(
            "Backend Engineer",
            vec![candidate("C1", 90), candidate("C2", 60), candidate("C3", 40)],
        );
        assert_eq!(session.state(), &ReviewState::Reviewing);
        assert_eq!(session.current().unwrap().name, "C1");

        assert_eq!(session.accept(), Decision::Advanced);
        assert_eq!(session.current().unwrap().name, "C2");

        assert_eq!(session.reject(), Decision::Advanced);
        assert_eq!(session.current().unwrap().name, "C3");

        assert_eq!(session.reject(), Decision::Finished);
        assert!(session.is_exhausted());
        assert_eq!(session.state(), &ReviewState::Exhausted);
        assert_eq!(names(session.accepted()), vec!["C1"]);
        assert_eq!(session.job_title(), Some("Backend Engineer"));
    }

    #[test]
    fn test_zero_candidates_is_empty() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_load("Unicorn Role");
        let state = session.finish_load(ticket, LoadOutcome::Ranked(vec![])).unwrap();
        assert_eq!(state, &ReviewState::Empty { detail: None });

        assert!(session.current().is_none());
        assert_eq!(session.accept(), Decision::Ignored);
        assert_eq!(session.reject(), Decision::Ignored);
        assert_eq!(session.cursor(), 0);
        assert!(session.accepted().is_empty());
    }

    #[test]
    fn test_reject_all_leaves_nothing_accepted() {
        let mut session = loaded(
            "QA",
            vec![candidate("A", 80), candidate("B", 70), candidate("C", 20)],
        );
        assert_eq!(session.reject(), Decision::Advanced);
        assert_eq!(session.reject(), Decision::Advanced);
        assert_eq!(session.reject(), Decision::Finished);
        assert!(session.accepted().is_empty());
        assert_eq!(session.state(), &ReviewState::Exhausted);
    }

    #[test]
    fn test_exhausted_session_ignores_further_decisions() {
        let mut session = loaded("SRE", vec![candidate("Only", 77)]);
        assert_eq!(session.accept(), Decision::Finished);

        for _ in 0..3 {
            assert_eq!(session.accept(), Decision::Ignored);
            assert_eq!(session.reject(), Decision::Ignored);
        }
        assert_eq!(session.cursor(), 1);
        assert_eq!(names(session.accepted()), vec!["Only"]);
        assert_eq!(session.state(), &ReviewState::Exhausted);
    }

    #[test]
    fn test_accepted_follows_decision_order_not_rank() {
        let mut session = loaded(
            "PM",
            vec![candidate("First", 95), candidate("Second", 85), candidate("Third", 30)],
        );
        session.reject();
        session.accept();
        session.accept();
        assert_eq!(names(session.accepted()), vec!["Second", "Third"]);
    }

    #[test]
    fn test_every_decision_sequence_keeps_invariants() {
        let queue: Vec<_> = (0..4).map(|i| candidate(&format!("c{i}"), 50 + i)).collect();

        for mask in 0u32..(1 << queue.len()) {
            let mut session = loaded("Any", queue.clone());
            let mut expected = Vec::new();
            let mut last_cursor = session.cursor();
            let mut last_accepted = 0;

            for (i, c) in queue.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    session.accept();
                    expected.push(c.name.as_str());
                } else {
                    session.reject();
                }
                assert_invariants(&session);
                assert_eq!(session.cursor(), last_cursor + 1, "cursor moves by exactly one");
                assert!(session.accepted().len() >= last_accepted, "accepted never shrinks");
                last_cursor = session.cursor();
                last_accepted = session.accepted().len();
            }

            // Extra decisions after exhaustion change nothing.
            session.accept();
            session.reject();
            assert_invariants(&session);
            assert_eq!(session.cursor(), queue.len());
            assert_eq!(names(session.accepted()), expected);
        }
    }

    #[test]
    fn test_reload_discards_previous_decisions() {
        let mut session = loaded("Backend Engineer", vec![candidate("A", 90), candidate("B", 80)]);
        session.accept();
        assert_eq!(session.accepted().len(), 1);

        let ticket = session.begin_load("Frontend Engineer");
        assert_eq!(session.state(), &ReviewState::Idle);
        assert!(session.accepted().is_empty());

        session
            .finish_load(ticket, LoadOutcome::Ranked(vec![candidate("X", 70), candidate("Y", 60)]))
            .unwrap();
        session.reject();
        session.accept();
        assert_eq!(names(session.accepted()), vec!["Y"]);
        assert_eq!(session.job_title(), Some("Frontend Engineer"));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut session = ReviewSession::new();
        let first = session.begin_load("Old Title");
        let second = session.begin_load("New Title");

        session
            .finish_load(second, LoadOutcome::Ranked(vec![candidate("New", 88)]))
            .unwrap();

        let err = session
            .finish_load(first, LoadOutcome::Ranked(vec![candidate("Old", 99)]))
            .unwrap_err();
        assert_eq!(err.ticket, first.value());
        assert_eq!(err.latest, second.value());

        assert_eq!(session.current().unwrap().name, "New");
        assert_eq!(session.job_title(), Some("New Title"));
    }

    #[test]
    fn test_reset_invalidates_in_flight_load() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_load("Data Engineer");
        session.reset();

        assert!(session
            .finish_load(ticket, LoadOutcome::Ranked(vec![candidate("Late", 50)]))
            .is_err());
        assert_eq!(session.state(), &ReviewState::Idle);
        assert!(session.job_title().is_none());
    }

    #[test]
    fn test_failed_load_enters_error_state() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_load("Designer");
        session
            .finish_load(
                ticket,
                LoadOutcome::Failed {
                    message: "connection refused".to_string(),
                },
            )
            .unwrap();
        assert_eq!(session.state().as_str(), "error");
        assert_eq!(session.accept(), Decision::Ignored);

        // Recoverable: another load works normally.
        let retry = session.begin_load("Designer");
        session
            .finish_load(retry, LoadOutcome::Ranked(vec![candidate("D", 61)]))
            .unwrap();
        assert_eq!(session.state(), &ReviewState::Reviewing);
    }

    #[test]
    fn test_application_error_keeps_detail() {
        let mut session = ReviewSession::new();
        let ticket = session.begin_load("Astronaut");
        session
            .finish_load(
                ticket,
                LoadOutcome::Empty {
                    detail: Some("No ideal profile".to_string()),
                },
            )
            .unwrap();
        assert_eq!(
            session.state(),
            &ReviewState::Empty {
                detail: Some("No ideal profile".to_string())
            }
        );
    }
}
