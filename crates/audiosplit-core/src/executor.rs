//! Pipeline executor: bounded background execution of the three job kinds.
//!
//! Intake hands a queued job id to [`PipelineExecutor::spawn`] and returns
//! to its caller immediately. The spawned task first acquires one of a
//! fixed number of worker permits — the job stays observably `Queued`
//! while it waits, which is the intended behavior under saturation — then
//! walks the job through `Processing` into `Done` or `Error`. Failures are
//! recorded as a category on the job record and never propagate to the
//! caller that created the job.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::audio::{self, Waveform};
use crate::engine::{validate_stems, SeparationEngine, Stem};
use crate::error::PipelineError;
use crate::job::{ArtifactRef, Job, JobId, JobKind};
use crate::registry::{JobRegistry, Transition};
use crate::store::ArtifactStore;

pub struct PipelineExecutor {
    registry: Arc<JobRegistry>,
    store: ArtifactStore,
    engine: Arc<dyn SeparationEngine>,
    /// Worker pool: at most this many jobs in `Processing` at once.
    permits: Arc<Semaphore>,
    /// Wall-clock bound for one pipeline run; overruns become `Timeout`.
    job_timeout: Duration,
}

impl PipelineExecutor {
    pub fn new(
        registry: Arc<JobRegistry>,
        store: ArtifactStore,
        engine: Arc<dyn SeparationEngine>,
        worker_slots: usize,
        job_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            store,
            engine,
            permits: Arc::new(Semaphore::new(worker_slots.max(1))),
            job_timeout,
        })
    }

    /// Fire-and-forget execution of a queued job.
    pub fn spawn(self: &Arc<Self>, job_id: JobId) {
        let executor = Arc::clone(self);
        tokio::spawn(async move {
            executor.run(job_id).await;
        });
    }

    async fn run(&self, job_id: JobId) {
        // Queue for a worker slot. The semaphore is never closed, so an
        // Err here means the executor itself is being torn down.
        let _permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(p) => p,
            Err(_) => return,
        };

        let Some(job) = self.registry.get(&job_id) else {
            error!(job_id = %job_id, "spawned job vanished from registry");
            return;
        };

        if let Err(e) = self.registry.transition(&job_id, Transition::Processing) {
            error!(job_id = %job_id, error = %e, "could not enter processing");
            return;
        }
        info!(job_id = %job_id, kind = job.kind.as_str(), "pipeline started");

        let result = match tokio::time::timeout(self.job_timeout, self.run_pipeline(&job)).await {
            Ok(r) => r,
            Err(_) => Err(PipelineError::Timeout),
        };

        match result {
            Ok(outputs) => {
                if let Err(e) = self.registry.transition(&job_id, Transition::Done(outputs)) {
                    error!(job_id = %job_id, error = %e, "could not record completion");
                } else {
                    info!(job_id = %job_id, "pipeline completed");
                }
            }
            Err(e) => {
                // Full detail to the logs; only the category onto the record.
                let category = e.category();
                warn!(job_id = %job_id, category, error = %e, "pipeline failed");
                if let Err(te) = self
                    .registry
                    .transition(&job_id, Transition::Error(category.to_owned()))
                {
                    error!(job_id = %job_id, error = %te, "could not record failure");
                }
            }
        }
    }

    async fn run_pipeline(
        &self,
        job: &Job,
    ) -> Result<BTreeMap<String, ArtifactRef>, PipelineError> {
        match job.kind {
            JobKind::Separate => self.run_separate(job).await,
            JobKind::Karaoke => self.run_karaoke(job).await,
            JobKind::Mix => self.run_mix(job).await,
        }
    }

    /// Separate: engine on the single input, one artifact per stem.
    async fn run_separate(
        &self,
        job: &Job,
    ) -> Result<BTreeMap<String, ArtifactRef>, PipelineError> {
        let stems = self.separate_input(job).await?;

        let mut outputs = BTreeMap::new();
        for (stem, waveform) in &stems {
            let bytes = audio::encode_wav(waveform).map_err(PipelineError::EncodeFailure)?;
            let artifact = self.store.write(&job.id, &stem.file_name(), &bytes).await?;
            outputs.insert(stem.as_str().to_owned(), artifact);
        }
        Ok(outputs)
    }

    /// Karaoke: engine on the single input, then sum every non-vocal stem.
    async fn run_karaoke(
        &self,
        job: &Job,
    ) -> Result<BTreeMap<String, ArtifactRef>, PipelineError> {
        let mut stems = self.separate_input(job).await?;
        stems.remove(&Stem::Vocals);

        let instrumental: Vec<Waveform> = [Stem::Drums, Stem::Bass, Stem::Other]
            .iter()
            .filter_map(|s| stems.remove(s))
            .collect();

        // The engine already passed set validation; a rate or channel
        // disagreement between its own stems is an engine-side fault.
        audio::ensure_compatible(&instrumental).map_err(PipelineError::EngineOutputMismatch)?;
        let karaoke = audio::mix(&instrumental).map_err(PipelineError::EngineOutputMismatch)?;

        let bytes = audio::encode_wav(&karaoke).map_err(PipelineError::EncodeFailure)?;
        let artifact = self.store.write(&job.id, "karaoke.wav", &bytes).await?;

        let mut outputs = BTreeMap::new();
        outputs.insert("karaoke".to_owned(), artifact);
        Ok(outputs)
    }

    /// Mix: decode all inputs, verify compatibility, direct additive sum.
    /// The separation engine is never involved.
    async fn run_mix(&self, job: &Job) -> Result<BTreeMap<String, ArtifactRef>, PipelineError> {
        let mut signals = Vec::with_capacity(job.inputs.len());
        for input in &job.inputs {
            let bytes = self.store.read(input).await?;
            let waveform = audio::decode_wav(&bytes).map_err(PipelineError::DecodeFailure)?;
            signals.push(waveform);
        }

        // Compatibility is checked across the full input set before any
        // summation so an incompatible job fails without partial work.
        audio::ensure_compatible(&signals).map_err(PipelineError::IncompatibleInputs)?;
        let mixed = audio::mix(&signals).map_err(PipelineError::IncompatibleInputs)?;

        let bytes = audio::encode_wav(&mixed).map_err(PipelineError::EncodeFailure)?;
        let artifact = self.store.write(&job.id, "mixed.wav", &bytes).await?;

        let mut outputs = BTreeMap::new();
        outputs.insert("mixed".to_owned(), artifact);
        Ok(outputs)
    }

    /// Invoke the engine on a job's single input and re-validate the stem
    /// set, independent of what the engine implementation checked.
    async fn separate_input(
        &self,
        job: &Job,
    ) -> Result<std::collections::HashMap<Stem, Waveform>, PipelineError> {
        let input = job
            .inputs
            .first()
            .ok_or_else(|| PipelineError::StorageFailure(crate::error::StoreError::NotFound {
                job: job.id.clone(),
                name: "input".to_owned(),
            }))?;
        let path = self.store.path_of(input);
        let stems = self.engine.separate(&path).await?;
        validate_stems(&stems)?;
        Ok(stems)
    }
}
