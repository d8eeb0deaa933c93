use serde::{Deserialize, Serialize};

use super::{null_as_default, optional_score, score};

/// One ranked candidate as returned by the shortlisting endpoint.
///
/// Only `name` and `match_score` are required; everything else is display
/// material that the backend may omit or send as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub name: String,
    #[serde(deserialize_with = "score")]
    pub match_score: u32, // 0 – 100
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub years_experience: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_matches: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skill_analysis: SkillAnalysis,
    #[serde(default)]
    pub section_scores: Option<SectionScores>,
    #[serde(default)]
    pub quick_judgment: Option<QuickJudgment>,
    #[serde(default)]
    pub candidate_overview: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ideal_profile: IdealProfileSnapshot,
}

impl CandidateMatch {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.match_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
}

/// Must-have skill coverage against the ideal profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub must_have_matches: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub must_have_total: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub must_have_percentage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skill_gaps: Vec<String>,
}

/// Per-section sub-scores, each 0 – 100.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    #[serde(default, deserialize_with = "optional_score")]
    pub experience: Option<u32>,
    #[serde(default, deserialize_with = "optional_score")]
    pub skills: Option<u32>,
    #[serde(default, deserialize_with = "optional_score")]
    pub education: Option<u32>,
    #[serde(default, deserialize_with = "optional_score")]
    pub overall_fit: Option<u32>,
}

impl SectionScores {
    /// An empty object `{}` counts as "no breakdown available".
    pub fn is_present(&self) -> bool {
        self.experience.is_some()
            || self.skills.is_some()
            || self.education.is_some()
            || self.overall_fit.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickJudgment {
    #[serde(default)]
    pub strength_1: Option<String>,
    #[serde(default)]
    pub strength_2: Option<String>,
    #[serde(default)]
    pub concern_1: Option<String>,
    #[serde(default)]
    pub concern_2: Option<String>,
}

impl QuickJudgment {
    pub fn is_present(&self) -> bool {
        non_blank(&self.strength_1) || non_blank(&self.concern_1)
    }
}

/// The ideal profile the backend matched against. Read-only reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdealProfileSnapshot {
    #[serde(default)]
    pub years_experience_required: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education_requirements: Vec<String>,
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Colour band for a 0 – 100 match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 75 => ScoreBand::High,
            s if s >= 50 => ScoreBand::Medium,
            _ => ScoreBand::Low,
        }
    }

    /// CSS class used by the page stylesheet.
    pub fn css_class(self) -> &'static str {
        match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::High => "Excellent Match",
            ScoreBand::Medium => "Good Match",
            ScoreBand::Low => "Needs Improvement",
        }
    }
}
