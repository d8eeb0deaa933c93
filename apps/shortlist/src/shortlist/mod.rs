// Shortlist review: a one-at-a-time accept/reject pass over the backend's
// ranked candidates for a job title, ending in a summary of the accepted ones.

pub mod handlers;
pub mod render;
pub mod session;

use serde::Serialize;

use crate::workspace::Workspace;
use render::Renderer;
use session::Decision;

/// What the page needs to redraw the shortlist tab.
#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub state: &'static str,
    pub job_title: Option<String>,
    /// Index of the candidate on screen; equals `total` once exhausted.
    pub position: usize,
    pub total: usize,
    pub exhausted: bool,
    pub accepted_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    pub html: String,
}

impl ReviewView {
    pub fn build(
        workspace: &Workspace,
        renderer: &Renderer,
        decision: Option<Decision>,
    ) -> Result<Self, minijinja::Error> {
        let review = &workspace.review;
        let job_title = review
            .job_title()
            .or(workspace.job_title.as_deref())
            .map(str::to_string);

        Ok(Self {
            state: review.state().as_str(),
            position: review.cursor(),
            total: review.queue_len(),
            exhausted: review.is_exhausted(),
            accepted_count: review.accepted().len(),
            decision,
            html: renderer.review(review, workspace.job_title.as_deref())?,
            job_title,
        })
    }
}
