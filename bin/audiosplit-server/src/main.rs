//! audiosplit-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise structured tracing (JSON in production, pretty in dev).
//! 3. Create the artifact store root directory.
//! 4. Wire up the job registry, separation engine and pipeline executor.
//! 5. Build the Axum router and start the HTTP server with graceful shutdown.

mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use audiosplit_core::{ArtifactStore, DemucsEngine, JobRegistry, PipelineExecutor, StatusService};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    // Build the log-level filter, warning loudly if the configured value is
    // not a valid tracing filter expression.
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: AUDIOSPLIT_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "audiosplit-server starting");

    // ── 3. Artifact store ──────────────────────────────────────────────────────
    tokio::fs::create_dir_all(&cfg.data_dir).await?;
    let store = ArtifactStore::new(cfg.data_dir.clone());
    info!(data_dir = %cfg.data_dir, "artifact store ready");

    // ── 4. Job pipeline ────────────────────────────────────────────────────────
    let job_timeout = Duration::from_secs(cfg.job_timeout_secs);
    let registry = Arc::new(JobRegistry::new());
    let engine = Arc::new(DemucsEngine::new(
        cfg.demucs_bin.clone(),
        cfg.demucs_model.clone(),
        job_timeout,
    ));
    let executor = PipelineExecutor::new(
        Arc::clone(&registry),
        store.clone(),
        engine,
        cfg.worker_slots,
        job_timeout,
    );
    let status = StatusService::new(Arc::clone(&registry), store.clone());
    info!(
        worker_slots = cfg.worker_slots,
        job_timeout_secs = cfg.job_timeout_secs,
        demucs_bin = %cfg.demucs_bin,
        demucs_model = %cfg.demucs_model,
        "pipeline executor initialised"
    );

    // ── 5. Shared application state ────────────────────────────────────────────
    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        registry,
        store,
        executor,
        status,
    });

    // ── 6. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let addr: SocketAddr = cfg.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("audiosplit-server stopped");
    Ok(())
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
