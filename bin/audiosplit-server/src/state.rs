//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use audiosplit_core::{ArtifactStore, JobRegistry, PipelineExecutor, StatusService};

use crate::config::Config;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Job table; single writer per id (the executor), many pollers.
    pub registry: Arc<JobRegistry>,
    /// Filesystem artifact namespace.
    pub store: ArtifactStore,
    /// Bounded background pipeline runner.
    pub executor: Arc<PipelineExecutor>,
    /// Read-only status/download facade for polling clients.
    pub status: StatusService,
}
