//! Wire schemas for the job API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use audiosplit_core::{JobState, StatusView};

/// Returned by every upload endpoint; the id is the handle for polling
/// and downloads.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobCreatedResponse {
    pub job_id: String,
}

/// Polled job status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// `queued`, `processing`, `done` or `error`.
    pub status: String,
    /// Logical output names; present once the job is done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stems: Option<Vec<String>>,
    /// Failure category; present only for failed jobs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StatusView> for StatusResponse {
    fn from(view: StatusView) -> Self {
        StatusResponse {
            status: view.state.as_str().to_owned(),
            stems: match view.state {
                JobState::Done => Some(view.outputs),
                _ => None,
            },
            error: view.error,
        }
    }
}
