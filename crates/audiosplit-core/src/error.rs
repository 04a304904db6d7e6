//! Per-layer error types.
//!
//! Processing-time failures are folded into [`PipelineError`], whose
//! [`category`](PipelineError::category) string is what lands in a job's
//! `error_detail` and is surfaced to polling clients. Full detail stays in
//! the server logs.

use thiserror::Error;

use crate::job::JobId;

/// Errors from the job registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// The requested state change violates the monotonic state machine.
    #[error("invalid transition for job {job}: {from} -> {to}")]
    InvalidTransition {
        job: JobId,
        from: &'static str,
        to: &'static str,
    },
}

/// Errors from the artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Logical name failed sanitization (traversal, empty, bad characters).
    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),

    /// An artifact with this (job, name) identity already exists.
    /// Outputs are written exactly once per pipeline run, so a second write
    /// is always a bug and is rejected rather than silently overwritten.
    #[error("artifact already exists: {job}/{name}")]
    AlreadyExists { job: JobId, name: String },

    #[error("artifact not found: {job}/{name}")]
    NotFound { job: JobId, name: String },

    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the WAV codec boundary and the mix primitive.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to decode wav: {0}")]
    Decode(#[from] hound::Error),

    #[error("unsupported wav sample format: {bits} bit {format}")]
    UnsupportedFormat { bits: u16, format: &'static str },

    #[error("sample rate mismatch: expected {expected} Hz, got {got} Hz")]
    SampleRateMismatch { expected: u32, got: u32 },

    #[error("channel layout mismatch: expected {expected} channels, got {got}")]
    ChannelMismatch { expected: u16, got: u16 },

    #[error("nothing to mix: no input signals")]
    NoSignals,
}

/// Errors from the separation engine adapter.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process could not be started or exited non-zero.
    #[error("separation engine failed: {0}")]
    Invocation(String),

    /// The engine produced a stem set differing from the fixed expected set.
    /// Partial results are never surfaced as success.
    #[error("engine returned incomplete stem set (missing: {missing:?}, unexpected: {unexpected:?})")]
    IncompleteStems {
        missing: Vec<&'static str>,
        unexpected: Vec<String>,
    },

    /// A stem file the engine reported could not be read back or decoded.
    #[error("failed to read engine output '{stem}': {message}")]
    OutputUnreadable { stem: String, message: String },

    #[error("separation engine timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// A failure while running a job's pipeline.
///
/// Each variant maps onto one short diagnostic category stored in the job
/// record; the original cause is preserved for logging.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Mix inputs disagree on sample rate or channel layout. Detected
    /// before any summation or engine work.
    #[error("incompatible mix inputs: {0}")]
    IncompatibleInputs(AudioError),

    /// The separation engine failed or returned a malformed stem set.
    #[error("engine failure: {0}")]
    EngineFailure(#[from] EngineError),

    /// Engine stems disagree with each other (karaoke summation).
    #[error("engine output mismatch: {0}")]
    EngineOutputMismatch(AudioError),

    /// An input could not be decoded.
    #[error("decode failure: {0}")]
    DecodeFailure(AudioError),

    /// A computed waveform could not be encoded for storage.
    #[error("encode failure: {0}")]
    EncodeFailure(AudioError),

    /// Reading or writing artifacts failed.
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StoreError),

    /// The whole pipeline exceeded its configured wall-clock bound.
    #[error("pipeline timed out")]
    Timeout,

    /// Registry refused a transition; indicates a logic bug, not user error.
    #[error("registry failure: {0}")]
    Registry(#[from] RegistryError),
}

impl PipelineError {
    /// Short category string recorded in `Job::error_detail` and shown to
    /// polling clients. Never includes paths, stderr, or stack traces.
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::IncompatibleInputs(_) => "IncompatibleInputs",
            PipelineError::EngineFailure(_) => "EngineFailure",
            PipelineError::EngineOutputMismatch(_) => "EngineOutputMismatch",
            PipelineError::DecodeFailure(_) => "DecodeFailure",
            PipelineError::EncodeFailure(_) => "StorageFailure",
            PipelineError::StorageFailure(_) => "StorageFailure",
            PipelineError::Timeout => "Timeout",
            PipelineError::Registry(_) => "Internal",
        }
    }
}
