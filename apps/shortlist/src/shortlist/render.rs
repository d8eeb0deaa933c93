//! HTML fragments for the shortlist page.
//!
//! Templates live in `templates/` and are embedded at compile time. Their
//! names end in `.html`, so minijinja escapes every interpolated value.
//! Truncation and number formatting happen here, in the view structs, so the
//! templates stay free of logic.

use minijinja::{context, Environment, Error};
use serde::Serialize;

use crate::models::{AnalysisResult, CandidateMatch, ScoreBand};
use crate::shortlist::session::{ReviewSession, ReviewState};

const MAX_LISTED: usize = 5;
const MAX_SKILLS: usize = 10;

const TEMPLATES: &[(&str, &str)] = &[
    ("card.html", include_str!("../../templates/card.html")),
    ("summary.html", include_str!("../../templates/summary.html")),
    ("empty.html", include_str!("../../templates/empty.html")),
    ("alert.html", include_str!("../../templates/alert.html")),
    ("idle.html", include_str!("../../templates/idle.html")),
    ("analysis.html", include_str!("../../templates/analysis.html")),
];

// ────────────────────────────────────────────────────────────────────────────
// View models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CandidateCard {
    position: usize,
    total: usize,
    name: String,
    overview: Option<String>,
    score: u32,
    band: &'static str,
    judgment: Option<JudgmentView>,
    section_scores: Option<Vec<ScoreBar>>,
    email: String,
    location: String,
    years_experience: String,
    years_required: Option<String>,
    education: Vec<EducationLine>,
    education_required: Option<String>,
    must_have: MustHaveView,
    missing_skills: Option<String>,
    skills: Vec<String>,
    extra_skills: usize,
    key_matches: Vec<String>,
    gaps: Vec<String>,
}

#[derive(Debug, Serialize)]
struct JudgmentView {
    strengths: String,
    concerns: String,
}

#[derive(Debug, Serialize)]
struct ScoreBar {
    label: &'static str,
    value: u32,
}

#[derive(Debug, Serialize)]
struct EducationLine {
    title: String,
    field: Option<String>,
}

#[derive(Debug, Serialize)]
struct MustHaveView {
    matches: u32,
    total: u32,
    percentage: String,
}

#[derive(Debug, Serialize)]
struct SummaryView {
    headline: String,
    entries: Vec<SummaryEntry>,
}

#[derive(Debug, Serialize)]
struct SummaryEntry {
    name: String,
    score: u32,
    band: &'static str,
    experience: String,
    email: String,
}

impl CandidateCard {
    fn new(candidate: &CandidateMatch, position: usize, total: usize) -> Self {
        let judgment = candidate
            .quick_judgment
            .as_ref()
            .filter(|j| j.is_present())
            .map(|j| JudgmentView {
                strengths: join_pair(&j.strength_1, &j.strength_2),
                concerns: join_pair(&j.concern_1, &j.concern_2),
            });

        let section_scores = candidate
            .section_scores
            .as_ref()
            .filter(|s| s.is_present())
            .map(|s| {
                vec![
                    ScoreBar { label: "Experience", value: s.experience.unwrap_or(0) },
                    ScoreBar { label: "Skills", value: s.skills.unwrap_or(0) },
                    ScoreBar { label: "Education", value: s.education.unwrap_or(0) },
                    ScoreBar { label: "Overall Fit", value: s.overall_fit.unwrap_or(0) },
                ]
            });

        let skill_analysis = &candidate.skill_analysis;
        let ideal = &candidate.ideal_profile;

        Self {
            position,
            total,
            name: candidate.name.clone(),
            overview: candidate
                .candidate_overview
                .clone()
                .filter(|o| !o.trim().is_empty()),
            score: candidate.match_score,
            band: candidate.band().css_class(),
            judgment,
            section_scores,
            email: or_placeholder(&candidate.email),
            location: or_placeholder(&candidate.location),
            years_experience: format_years(candidate.years_experience),
            years_required: ideal.years_experience_required.map(format_number),
            education: candidate
                .education
                .iter()
                .map(|e| EducationLine {
                    title: format!("{} - {}", e.degree, e.institution),
                    field: e.field_of_study.clone().filter(|f| !f.trim().is_empty()),
                })
                .collect(),
            education_required: (!ideal.education_requirements.is_empty())
                .then(|| ideal.education_requirements.join(", ")),
            must_have: MustHaveView {
                matches: skill_analysis.must_have_matches,
                total: skill_analysis.must_have_total,
                percentage: format_number(skill_analysis.must_have_percentage),
            },
            missing_skills: truncated_list(&skill_analysis.skill_gaps, MAX_LISTED),
            skills: candidate.skills.iter().take(MAX_SKILLS).cloned().collect(),
            extra_skills: candidate.skills.len().saturating_sub(MAX_SKILLS),
            key_matches: candidate.key_matches.iter().take(MAX_LISTED).cloned().collect(),
            gaps: candidate.gaps.iter().take(MAX_LISTED).cloned().collect(),
        }
    }
}

impl SummaryView {
    fn new(accepted: &[CandidateMatch]) -> Self {
        Self {
            headline: shortlisted_headline(accepted.len()),
            entries: accepted
                .iter()
                .map(|c| SummaryEntry {
                    name: c.name.clone(),
                    score: c.match_score,
                    band: c.band().css_class(),
                    experience: format_years(c.years_experience),
                    email: or_placeholder(&c.email),
                })
                .collect(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

/// Owns the template environment. Built once at startup and shared via `AppState`.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Renders the fragment for the session's current state.
    ///
    /// `workspace_job_title` is the title an `Idle` session would load with;
    /// it is only used for the idle hint.
    pub fn review(
        &self,
        session: &ReviewSession,
        workspace_job_title: Option<&str>,
    ) -> Result<String, Error> {
        match session.state() {
            ReviewState::Idle => self.idle(workspace_job_title),
            ReviewState::Reviewing => match session.current() {
                Some(candidate) => self.card(candidate, session.cursor() + 1, session.queue_len()),
                None => self.summary(session.accepted()),
            },
            ReviewState::Exhausted => self.summary(session.accepted()),
            ReviewState::Empty { detail } => self.empty(detail.as_deref()),
            ReviewState::Error { message } => self.alert("error", &format!("Error: {message}")),
        }
    }

    pub fn card(
        &self,
        candidate: &CandidateMatch,
        position: usize,
        total: usize,
    ) -> Result<String, Error> {
        let card = CandidateCard::new(candidate, position, total);
        self.env.get_template("card.html")?.render(context! { card })
    }

    pub fn summary(&self, accepted: &[CandidateMatch]) -> Result<String, Error> {
        let summary = SummaryView::new(accepted);
        self.env
            .get_template("summary.html")?
            .render(context! { summary })
    }

    pub fn empty(&self, detail: Option<&str>) -> Result<String, Error> {
        self.env.get_template("empty.html")?.render(context! { detail })
    }

    pub fn idle(&self, job_title: Option<&str>) -> Result<String, Error> {
        self.env.get_template("idle.html")?.render(context! { job_title })
    }

    /// `kind` is one of `error`, `warning`, `success`, `info`.
    pub fn alert(&self, kind: &str, message: &str) -> Result<String, Error> {
        self.env
            .get_template("alert.html")?
            .render(context! { kind, message })
    }

    pub fn analysis(&self, analysis: &AnalysisResult, job_title: &str) -> Result<String, Error> {
        let band = ScoreBand::from_score(analysis.match_score);
        self.env.get_template("analysis.html")?.render(context! {
            analysis,
            job_title,
            band => band.css_class(),
            label => band.label(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Formatting helpers
// ────────────────────────────────────────────────────────────────────────────

pub fn shortlisted_headline(count: usize) -> String {
    match count {
        1 => "1 candidate shortlisted.".to_string(),
        n => format!("{n} candidates shortlisted."),
    }
}

fn join_pair(first: &Option<String>, second: &Option<String>) -> String {
    [first, second]
        .into_iter()
        .filter_map(|s| s.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" • ")
}

fn truncated_list(items: &[String], limit: usize) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut joined = items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > limit {
        joined.push_str("...");
    }
    Some(joined)
}

fn or_placeholder(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("Not provided")
        .to_string()
}

fn format_years(years: Option<f64>) -> String {
    match years {
        Some(y) => format!("{} years", format_number(y)),
        None => "Not specified".to_string(),
    }
}

/// One decimal at most; whole numbers print without a fraction.
fn format_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{rounded}")
}
