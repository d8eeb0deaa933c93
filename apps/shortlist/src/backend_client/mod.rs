//! Backend client: the single point of entry for all calls to the
//! resume-analysis backend.
//!
//! No other module talks HTTP to the backend directly. Handlers and the
//! workspace layer depend on the [`TalentBackend`] trait so they can be
//! exercised against in-memory fakes.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{AnalysisRequest, AnalysisResult, CandidateMatch, CandidateRecord};

const SHORTLIST_PATH: &str = "/api/shortlisting/candidates";
const CANDIDATES_PATH: &str = "/api/candidates";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a shortlist retrieval that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortlistFetch {
    /// At least one candidate, in the backend's ranking order.
    Ranked(Vec<CandidateMatch>),
    /// No candidates, or an application-level refusal carrying `detail`.
    Empty { detail: Option<String> },
}

/// Everything the presentation layer needs from the backend.
///
/// Carried in `AppState` as `Arc<dyn TalentBackend>`.
#[async_trait]
pub trait TalentBackend: Send + Sync {
    async fn fetch_shortlist(&self, job_title: &str) -> Result<ShortlistFetch, BackendError>;

    async fn analyze_candidate(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, BackendError>;

    async fn list_candidates(&self) -> Result<Vec<CandidateRecord>, BackendError>;
}

#[derive(Debug, Deserialize)]
struct ShortlistBody {
    #[serde(default)]
    candidates: Option<Vec<CandidateMatch>>,
    #[serde(default)]
    detail: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CandidateListBody {
    #[serde(default)]
    candidates: Option<Vec<CandidateRecord>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// HTTP implementation of [`TalentBackend`] over `reqwest`.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, api_token: Option<&str>, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = api_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .context("BACKEND_API_TOKEN contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("BACKEND_URL is not a valid URL: '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("BACKEND_URL must be an http(s) URL, got '{base_url}'");
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            &config.backend_url,
            config.backend_api_token.as_deref(),
            Duration::from_secs(config.backend_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the base URL. Each segment is percent-encoded on
    /// its own, so a `/`, `?` or `#` inside one stays inside it.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[async_trait]
impl TalentBackend for BackendClient {
    /// `GET /api/shortlisting/candidates?job_title=...`
    ///
    /// Non-2xx responses with a JSON body are application errors and map to
    /// [`ShortlistFetch::Empty`]; only transport and decoding failures are `Err`.
    async fn fetch_shortlist(&self, job_title: &str) -> Result<ShortlistFetch, BackendError> {
        let response = self
            .client
            .get(self.endpoint(segments(SHORTLIST_PATH)))
            .query(&[("job_title", job_title)])
            .send()
            .await
            .map_err(|e| {
                warn!(job_title, "Shortlist request failed: {e}");
                BackendError::Http(e)
            })?;

        let status = response.status();
        let body: ShortlistBody = read_json(response).await.map_err(|e| {
            warn!(job_title, %status, "Shortlist response was not valid JSON: {e}");
            e
        })?;

        if !status.is_success() {
            let detail = body.detail.as_ref().map(detail_text);
            warn!(job_title, %status, ?detail, "Backend declined shortlist request");
            return Ok(ShortlistFetch::Empty { detail });
        }

        match body.candidates {
            Some(candidates) if !candidates.is_empty() => {
                debug!(job_title, count = candidates.len(), "Shortlist fetched");
                Ok(ShortlistFetch::Ranked(candidates))
            }
            _ => {
                debug!(job_title, "Shortlist fetched with no candidates");
                Ok(ShortlistFetch::Empty {
                    detail: body.detail.as_ref().map(detail_text),
                })
            }
        }
    }

    /// `POST /api/candidates/{id}/analyze?job_title=..&job_location=..&use_rag=true`
    async fn analyze_candidate(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, BackendError> {
        let url = self.endpoint(
            segments(CANDIDATES_PATH).chain([request.candidate_id.as_str(), "analyze"]),
        );
        let response = self
            .client
            .post(url)
            .query(&[
                ("job_title", request.job_title.as_str()),
                ("job_location", request.job_location.as_str()),
                ("use_rag", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = api_error(status, response, "Analysis failed").await;
            warn!(candidate_id = %request.candidate_id, "Analysis rejected: {err}");
            return Err(err);
        }

        let result: AnalysisResult = read_json(response).await?;
        debug!(
            candidate_id = %request.candidate_id,
            match_score = result.match_score,
            "Analysis completed"
        );
        Ok(result)
    }

    /// `GET /api/candidates`
    async fn list_candidates(&self) -> Result<Vec<CandidateRecord>, BackendError> {
        let response = self
            .client
            .get(self.endpoint(segments(CANDIDATES_PATH)))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = api_error(status, response, "Failed to load candidates").await;
            warn!("Candidate listing rejected: {err}");
            return Err(err);
        }

        let body: CandidateListBody = read_json(response).await?;
        let candidates = body.candidates.unwrap_or_default();
        debug!(count = candidates.len(), "Candidates listed");
        Ok(candidates)
    }
}

/// Reads the whole body and decodes it as JSON. A body that is not JSON is a
/// [`BackendError::Parse`], which callers treat as a transport failure.
async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(BackendError::Parse)
}

async fn api_error(status: StatusCode, response: Response, fallback: &str) -> BackendError {
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail)
        .map(|d| detail_text(&d))
        .unwrap_or_else(|| fallback.to_string());
    BackendError::Api {
        status: status.as_u16(),
        message,
    }
}

/// FastAPI sends `detail` as a string for handled errors and as a list of
/// objects for validation failures.
fn detail_text(detail: &Value) -> String {
    match detail {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.get("msg")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| item.to_string())
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
