use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a submitted job.
///
/// Generated once at creation and never reused; the string form doubles as
/// the job's directory name inside the artifact store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Allocate a fresh, collision-free id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The three pipeline kinds a job can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    /// Split one recording into the fixed stem set.
    Separate,
    /// Additively combine two or more recordings into one.
    Mix,
    /// Separate, then recombine everything except the vocals stem.
    Karaoke,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Separate => "separate",
            JobKind::Mix => "mix",
            JobKind::Karaoke => "karaoke",
        }
    }
}

/// Lifecycle state of a job.
///
/// Transitions are monotonic: `Queued → Processing → {Done, Error}`.
/// Nothing ever leaves `Done` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Accepted; waiting for a worker slot.
    Queued,
    /// A worker is running the pipeline.
    Processing,
    /// All expected outputs were produced and stored.
    Done,
    /// The pipeline failed; `error_detail` names the category.
    Error,
}

impl JobState {
    /// Wire representation used by the polling status protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Processing => "processing",
            JobState::Done => "done",
            JobState::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Error)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (JobState::Queued, JobState::Processing)
                | (JobState::Processing, JobState::Done)
                | (JobState::Processing, JobState::Error)
        )
    }
}

/// Reference to one owned file inside the artifact store's namespace.
///
/// Identity is the pair (job id, file name); the store maps it to
/// `<root>/<job_id>/<name>`. Names are sanitized before a reference can be
/// minted, so no reference can escape its job directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub job: JobId,
    pub name: String,
}

/// The complete record for a single job.
///
/// Owned exclusively by the [`JobRegistry`]; callers only ever see snapshot
/// clones. `inputs` are immutable after creation. `outputs` is empty until
/// the job reaches `Done`, at which point it is fully populated.
///
/// [`JobRegistry`]: crate::registry::JobRegistry
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub state: JobState,
    pub inputs: Vec<ArtifactRef>,
    /// Logical output name (e.g. `"vocals"`, `"mixed"`) → stored file.
    pub outputs: BTreeMap<String, ArtifactRef>,
    /// Short diagnostic category, set only in `Error` state.
    pub error_detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
