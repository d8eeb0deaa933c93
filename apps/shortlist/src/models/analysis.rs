use serde::{Deserialize, Serialize};

use super::{null_as_default, score};

/// Input of the job-match analysis step. The job title it carries becomes
/// the workspace's shortlist job title once the analysis succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub candidate_id: String,
    pub job_title: String,
    pub job_location: String,
}

/// Backend response of `POST /api/candidates/{id}/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub analysis_id: Option<String>,
    #[serde(deserialize_with = "score")]
    pub match_score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key_matches: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gaps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<String>,
}

/// One uploaded candidate, as listed by `GET /api/candidates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_data: ProfileData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
