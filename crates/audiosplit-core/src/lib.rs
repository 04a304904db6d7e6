//! audiosplit-core – job orchestration and artifact pipeline.
//!
//! The crate is layered leaves-first:
//!
//! 1. [`store`] – filesystem artifact namespace, keyed by job id.
//! 2. [`audio`] – WAV codec boundary and the additive mix primitive.
//! 3. [`engine`] – adapter over the external separation engine (Demucs).
//! 4. [`registry`] – in-memory job table owning all state transitions.
//! 5. [`executor`] – bounded background execution of the three pipelines.
//! 6. [`status`] – read-only query surface for polling clients.
//!
//! No HTTP types appear anywhere in this crate; the server binary maps
//! these components onto its routes.

pub mod audio;
pub mod engine;
pub mod error;
pub mod executor;
pub mod job;
pub mod registry;
pub mod status;
pub mod store;

pub use engine::{DemucsEngine, SeparationEngine, Stem};
pub use error::{EngineError, PipelineError, RegistryError, StoreError};
pub use executor::PipelineExecutor;
pub use job::{ArtifactRef, Job, JobId, JobKind, JobState};
pub use registry::JobRegistry;
pub use status::{QueryError, StatusService, StatusView};
pub use store::ArtifactStore;
