//! Read-only query surface over the registry and store.
//!
//! This is what polling clients hit every couple of seconds, so every
//! operation here is a pure read: no side effects, no rate-dependent
//! behavior, just the latest known state.

use tracing::debug;

use crate::error::StoreError;
use crate::job::{JobId, JobState};
use crate::registry::JobRegistry;
use crate::store::ArtifactStore;
use std::sync::Arc;

/// Snapshot returned to a status poll.
#[derive(Debug, Clone)]
pub struct StatusView {
    pub state: JobState,
    /// Logical output names, sorted; present only once the job is `Done`.
    pub outputs: Vec<String>,
    /// Failure category; present only in `Error` state.
    pub error: Option<String>,
}

/// Why a status or download query could not be answered.
///
/// Deliberately coarse: a client cannot distinguish "no such job" from
/// "no such artifact" from "not finished yet" beyond what these variants
/// say, and none of them reveal storage layout.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("job not found: {0}")]
    UnknownJob(JobId),

    /// The job exists but has not reached `Done`; artifacts are not
    /// downloadable early, even if some bytes already exist on disk.
    #[error("job {0} is not finished")]
    NotReady(JobId),

    #[error("job {job} has no artifact named {name:?}")]
    UnknownArtifact { job: JobId, name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct StatusService {
    registry: Arc<JobRegistry>,
    store: ArtifactStore,
}

impl StatusService {
    pub fn new(registry: Arc<JobRegistry>, store: ArtifactStore) -> Self {
        Self { registry, store }
    }

    /// Current state of a job: state, output names (never bytes), error
    /// category.
    pub fn status(&self, id: &JobId) -> Result<StatusView, QueryError> {
        let job = self
            .registry
            .get(id)
            .ok_or_else(|| QueryError::UnknownJob(id.clone()))?;
        Ok(StatusView {
            state: job.state,
            outputs: job.outputs.keys().cloned().collect(),
            error: job.error_detail,
        })
    }

    /// Fetch a finished artifact's bytes.
    ///
    /// `name` may be the logical output name (`"vocals"`) or the stored
    /// file name (`"vocals.wav"`). Repeated downloads return identical
    /// bytes — artifacts are read-only once written.
    pub async fn download(&self, id: &JobId, name: &str) -> Result<Vec<u8>, QueryError> {
        let job = self
            .registry
            .get(id)
            .ok_or_else(|| QueryError::UnknownJob(id.clone()))?;
        if job.state != JobState::Done {
            return Err(QueryError::NotReady(id.clone()));
        }

        let artifact = job
            .outputs
            .get(name)
            .or_else(|| {
                name.strip_suffix(".wav")
                    .and_then(|logical| job.outputs.get(logical))
            })
            .ok_or_else(|| QueryError::UnknownArtifact {
                job: id.clone(),
                name: name.to_owned(),
            })?;

        debug!(job_id = %id, name, "serving artifact download");
        Ok(self.store.read(artifact).await?)
    }
}
