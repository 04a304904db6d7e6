//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for audiosplit-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// Root directory of the artifact store (default: `"./data"`).
    /// Uploads and produced outputs live under one subdirectory per job.
    pub data_dir: String,

    /// Maximum size of a single uploaded file, in megabytes.
    pub max_upload_mb: usize,

    /// How many maximum-size files one request body is budgeted for.
    /// Together with `max_upload_mb` this sets the request-level size
    /// limit; a mix upload of more than this many near-limit files needs
    /// the budget raised. The per-file cap is enforced separately during
    /// multipart streaming.
    pub max_batch_files: usize,

    /// Worker pool size: maximum number of jobs processing concurrently.
    /// Separation is resource-heavy, so this should roughly match the
    /// machine's CPU/GPU capacity.
    pub worker_slots: usize,

    /// Wall-clock bound for a single job's pipeline, in seconds. A job
    /// exceeding it is failed with the `Timeout` category.
    pub job_timeout_secs: u64,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated allowed CORS origins; `None` means wildcard (dev).
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (disable in production).
    pub enable_swagger: bool,

    /// Separation engine binary name or path (default: `"demucs"`).
    pub demucs_bin: String,

    /// Demucs model passed via `-n` (default: `"htdemucs"`).
    pub demucs_model: String,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("AUDIOSPLIT_BIND", "0.0.0.0:8000"),
            data_dir: env_or("AUDIOSPLIT_DATA_DIR", "./data"),
            max_upload_mb: parse_env("AUDIOSPLIT_MAX_UPLOAD_MB", 100),
            max_batch_files: parse_env("AUDIOSPLIT_MAX_BATCH_FILES", 16),
            worker_slots: parse_env("AUDIOSPLIT_WORKER_SLOTS", 2),
            job_timeout_secs: parse_env("AUDIOSPLIT_JOB_TIMEOUT_SECS", 1800),
            log_level: env_or("AUDIOSPLIT_LOG", "info"),
            log_json: std::env::var("AUDIOSPLIT_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            cors_allowed_origins: std::env::var("AUDIOSPLIT_CORS_ORIGINS").ok(),
            enable_swagger: std::env::var("AUDIOSPLIT_ENABLE_SWAGGER")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            demucs_bin: env_or("AUDIOSPLIT_DEMUCS_BIN", "demucs"),
            demucs_model: env_or("AUDIOSPLIT_DEMUCS_MODEL", "htdemucs"),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
