//! In-memory job registry.
//!
//! Single owner of every [`Job`] record. Backed by a sharded map so that a
//! transition locks only the entry it touches — polling one job never
//! blocks workers mutating another. Callers receive snapshot clones;
//! mutation happens exclusively through [`JobRegistry::transition`], which
//! enforces the monotonic state machine.

use std::collections::BTreeMap;

use chrono::Utc;
use dashmap::DashMap;
use tracing::info;

use crate::error::RegistryError;
use crate::job::{ArtifactRef, Job, JobId, JobKind, JobState};

/// A requested state change, carrying exactly the payload its target state
/// requires: outputs only into `Done`, an error category only into `Error`.
#[derive(Debug)]
pub enum Transition {
    Processing,
    Done(BTreeMap<String, ArtifactRef>),
    Error(String),
}

impl Transition {
    fn target(&self) -> JobState {
        match self {
            Transition::Processing => JobState::Processing,
            Transition::Done(_) => JobState::Done,
            Transition::Error(_) => JobState::Error,
        }
    }
}

#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<JobId, Job>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a job in `Queued` state and return a snapshot of it.
    ///
    /// The id comes from [`JobId::generate`], called by intake before the
    /// uploads are persisted so that the artifacts and the record share a
    /// namespace. The record is inserted before this returns, so a handed
    /// back id always resolves.
    pub fn create(&self, id: JobId, kind: JobKind, inputs: Vec<ArtifactRef>) -> Job {
        let job = Job {
            id,
            kind,
            state: JobState::Queued,
            inputs,
            outputs: BTreeMap::new(),
            error_detail: None,
            created_at: Utc::now(),
        };
        self.jobs.insert(job.id.clone(), job.clone());
        info!(job_id = %job.id, kind = job.kind.as_str(), "job created");
        job
    }

    /// Snapshot of a job record.
    pub fn get(&self, id: &JobId) -> Option<Job> {
        self.jobs.get(id).map(|entry| entry.clone())
    }

    /// Apply a state transition, enforcing the state machine.
    ///
    /// All writes to one id are serialized on its map entry; a second
    /// writer racing on the same id sees the first writer's state and gets
    /// [`RegistryError::InvalidTransition`] if the change is no longer
    /// legal.
    pub fn transition(&self, id: &JobId, transition: Transition) -> Result<(), RegistryError> {
        let mut entry = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let target = transition.target();
        if !entry.state.can_transition_to(target) {
            return Err(RegistryError::InvalidTransition {
                job: id.clone(),
                from: entry.state.as_str(),
                to: target.as_str(),
            });
        }

        match transition {
            Transition::Processing => {}
            Transition::Done(outputs) => {
                entry.outputs = outputs;
            }
            Transition::Error(category) => {
                entry.error_detail = Some(category);
            }
        }
        entry.state = target;
        info!(job_id = %id, state = target.as_str(), "job transitioned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_ref(job: &JobId, name: &str) -> ArtifactRef {
        ArtifactRef {
            job: job.clone(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn created_job_is_immediately_resolvable() {
        let registry = JobRegistry::new();
        let job = registry.create(JobId::generate(), JobKind::Separate, Vec::new());
        let got = registry.get(&job.id).expect("job should resolve");
        assert_eq!(got.state, JobState::Queued);
        assert_eq!(got.kind, JobKind::Separate);
        assert!(got.outputs.is_empty());
        assert!(got.error_detail.is_none());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let registry = JobRegistry::new();
        assert!(registry.get(&JobId::generate()).is_none());
        let err = registry
            .transition(&JobId::generate(), Transition::Processing)
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }

    #[test]
    fn happy_path_transitions_to_done_with_outputs() {
        let registry = JobRegistry::new();
        let job = registry.create(JobId::generate(), JobKind::Mix, Vec::new());

        registry
            .transition(&job.id, Transition::Processing)
            .expect("queued -> processing");
        assert!(registry.get(&job.id).unwrap().outputs.is_empty());

        let mut outputs = BTreeMap::new();
        outputs.insert("mixed".to_owned(), output_ref(&job.id, "mixed.wav"));
        registry
            .transition(&job.id, Transition::Done(outputs))
            .expect("processing -> done");

        let done = registry.get(&job.id).unwrap();
        assert_eq!(done.state, JobState::Done);
        assert_eq!(done.outputs.len(), 1);
        assert!(done.outputs.contains_key("mixed"));
    }

    #[test]
    fn error_path_records_category() {
        let registry = JobRegistry::new();
        let job = registry.create(JobId::generate(), JobKind::Karaoke, Vec::new());
        registry
            .transition(&job.id, Transition::Processing)
            .unwrap();
        registry
            .transition(&job.id, Transition::Error("EngineFailure".into()))
            .unwrap();

        let failed = registry.get(&job.id).unwrap();
        assert_eq!(failed.state, JobState::Error);
        assert_eq!(failed.error_detail.as_deref(), Some("EngineFailure"));
        assert!(failed.outputs.is_empty());
    }

    #[test]
    fn done_cannot_be_skipped_or_revisited() {
        let registry = JobRegistry::new();
        let job = registry.create(JobId::generate(), JobKind::Separate, Vec::new());

        // Queued -> Done skips Processing.
        let err = registry
            .transition(&job.id, Transition::Done(BTreeMap::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTransition { .. }));

        registry
            .transition(&job.id, Transition::Processing)
            .unwrap();
        registry
            .transition(&job.id, Transition::Done(BTreeMap::new()))
            .unwrap();

        // Terminal state admits nothing.
        for bad in [
            Transition::Processing,
            Transition::Done(BTreeMap::new()),
            Transition::Error("Timeout".into()),
        ] {
            let err = registry.transition(&job.id, bad).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidTransition { .. }));
        }
    }
}
