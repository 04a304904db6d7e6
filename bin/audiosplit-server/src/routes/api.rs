//! Job API: uploads, status polling, downloads.
//!
//! Upload handlers are the intake path: they validate the multipart
//! payload completely before touching the filesystem, persist the inputs
//! under a fresh job id, create the registry record, and hand the job to
//! the executor. The response returns immediately with the job id; the
//! caller discovers progress exclusively through `GET /api/status/{id}`.

use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, info, warn};
use utoipa::OpenApi;

use audiosplit_core::store::sanitize_filename;
use audiosplit_core::{JobId, JobKind};

use crate::error::ServerError;
use crate::schemas::{JobCreatedResponse, StatusResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        upload_audio,
        karaoke_mode,
        mix_audio,
        get_status,
        download_stem,
        download_karaoke,
        download_mixed,
    ),
    components(schemas(JobCreatedResponse, StatusResponse))
)]
pub struct JobsApi;

/// Register job routes (nested under `/api`).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload", post(upload_audio))
        .route("/karaoke", post(karaoke_mode))
        .route("/mix", post(mix_audio))
        .route("/status/{job_id}", get(get_status))
        .route("/download/{job_id}/{filename}", get(download_stem))
        .route("/download_karaoke/{job_id}", get(download_karaoke))
        .route("/download_mixed/{job_id}", get(download_mixed))
}

// ── Intake ────────────────────────────────────────────────────────────────────

/// Upload one audio file for stem separation (`POST /api/upload`).
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "jobs",
    request_body(content_type = "multipart/form-data", description = "One audio file"),
    responses(
        (status = 200, description = "Separation job created", body = JobCreatedResponse),
        (status = 400, description = "Invalid upload"),
    )
)]
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<JobCreatedResponse>, ServerError> {
    let files = read_uploads(&state, multipart).await?;
    let [file] = <[Upload; 1]>::try_from(files)
        .map_err(|_| ServerError::BadRequest("exactly one audio file is required".into()))?;
    create_job(&state, JobKind::Separate, vec![file]).await
}

/// Upload one audio file for vocal removal (`POST /api/karaoke`).
#[utoipa::path(
    post,
    path = "/api/karaoke",
    tag = "jobs",
    request_body(content_type = "multipart/form-data", description = "One audio file"),
    responses(
        (status = 200, description = "Karaoke job created", body = JobCreatedResponse),
        (status = 400, description = "Invalid upload"),
    )
)]
pub async fn karaoke_mode(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<JobCreatedResponse>, ServerError> {
    let files = read_uploads(&state, multipart).await?;
    let [file] = <[Upload; 1]>::try_from(files)
        .map_err(|_| ServerError::BadRequest("exactly one audio file is required".into()))?;
    create_job(&state, JobKind::Karaoke, vec![file]).await
}

/// Upload two or more audio files to combine (`POST /api/mix`).
#[utoipa::path(
    post,
    path = "/api/mix",
    tag = "jobs",
    request_body(content_type = "multipart/form-data", description = "Two or more audio files"),
    responses(
        (status = 200, description = "Mix job created", body = JobCreatedResponse),
        (status = 400, description = "Invalid upload or fewer than two files"),
    )
)]
pub async fn mix_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<JobCreatedResponse>, ServerError> {
    let files = read_uploads(&state, multipart).await?;
    if files.len() < 2 {
        return Err(ServerError::BadRequest(
            "at least 2 audio files are required for mixing".into(),
        ));
    }
    create_job(&state, JobKind::Mix, files).await
}

// ── Status / downloads ────────────────────────────────────────────────────────

/// Poll job status (`GET /api/status/{job_id}`).
///
/// Pure read; clients poll this on a fixed interval until the status is
/// `done` or `error`.
#[utoipa::path(
    get,
    path = "/api/status/{job_id}",
    tag = "jobs",
    params(("job_id" = String, Path, description = "Job to query")),
    responses(
        (status = 200, description = "Current job status", body = StatusResponse),
        (status = 404, description = "Unknown job"),
    )
)]
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<StatusResponse>, ServerError> {
    let view = state.status.status(&JobId::from(job_id.as_str()))?;
    Ok(Json(view.into()))
}

/// Download a separated stem (`GET /api/download/{job_id}/{filename}`).
#[utoipa::path(
    get,
    path = "/api/download/{job_id}/{filename}",
    tag = "jobs",
    params(
        ("job_id" = String, Path, description = "Job that produced the stem"),
        ("filename" = String, Path, description = "Stem name, with or without .wav"),
    ),
    responses(
        (status = 200, description = "Stem audio", content_type = "audio/wav"),
        (status = 404, description = "Unknown job, unknown stem, or job not done"),
    )
)]
pub async fn download_stem(
    State(state): State<Arc<AppState>>,
    Path((job_id, filename)): Path<(String, String)>,
) -> Result<Response, ServerError> {
    serve_artifact(&state, &job_id, &filename).await
}

/// Download the karaoke result (`GET /api/download_karaoke/{job_id}`).
#[utoipa::path(
    get,
    path = "/api/download_karaoke/{job_id}",
    tag = "jobs",
    params(("job_id" = String, Path, description = "Karaoke job")),
    responses(
        (status = 200, description = "Instrumental audio", content_type = "audio/wav"),
        (status = 404, description = "Unknown job or job not done"),
    )
)]
pub async fn download_karaoke(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Response, ServerError> {
    serve_artifact(&state, &job_id, "karaoke").await
}

/// Download the mix result (`GET /api/download_mixed/{job_id}`).
#[utoipa::path(
    get,
    path = "/api/download_mixed/{job_id}",
    tag = "jobs",
    params(("job_id" = String, Path, description = "Mix job")),
    responses(
        (status = 200, description = "Mixed audio", content_type = "audio/wav"),
        (status = 404, description = "Unknown job or job not done"),
    )
)]
pub async fn download_mixed(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Response, ServerError> {
    serve_artifact(&state, &job_id, "mixed").await
}

async fn serve_artifact(
    state: &AppState,
    job_id: &str,
    name: &str,
) -> Result<Response, ServerError> {
    let bytes = state.status.download(&JobId::from(job_id), name).await?;

    let attachment = if name.ends_with(".wav") {
        name.to_owned()
    } else {
        format!("{name}.wav")
    };
    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{attachment}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

// ── Intake internals ──────────────────────────────────────────────────────────

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
}

const ACCEPTED_EXTENSIONS: [&str; 2] = [".wav", ".mp3"];

/// Drain the multipart payload into memory, validating as it streams.
///
/// All validation happens here, before any filesystem write, so a
/// rejected request leaves no partial state behind.
async fn read_uploads(state: &AppState, mut multipart: Multipart) -> Result<Vec<Upload>, ServerError> {
    let max_bytes = state.config.max_upload_bytes();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("failed to read multipart field: {e}")))?
    {
        // Non-file fields are not part of the contract.
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            let name = field.name().unwrap_or("unknown").to_owned();
            return Err(ServerError::BadRequest(format!("unexpected field: {name}")));
        };

        let lower = file_name.to_lowercase();
        if !ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            return Err(ServerError::BadRequest(
                "only .mp3 and .wav files are supported".into(),
            ));
        }

        let bytes = read_field_capped(field, max_bytes, state.config.max_upload_mb).await?;
        if bytes.is_empty() {
            return Err(ServerError::BadRequest(format!(
                "uploaded file {file_name:?} is empty"
            )));
        }

        debug!(file_name = %file_name, size_bytes = bytes.len(), "received file upload");
        files.push(Upload { file_name, bytes });
    }

    if files.is_empty() {
        return Err(ServerError::BadRequest("no file uploaded".into()));
    }
    Ok(files)
}

/// Stream one field into memory, enforcing the per-file size limit as
/// chunks arrive rather than after the fact.
async fn read_field_capped(
    mut field: Field<'_>,
    max_bytes: usize,
    max_mb: usize,
) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ServerError::BadRequest(format!("failed to read file chunk: {e}")))?
    {
        bytes.extend_from_slice(&chunk);
        if bytes.len() > max_bytes {
            return Err(ServerError::BadRequest(format!(
                "file too large; the maximum allowed size is {max_mb} MB"
            )));
        }
    }
    Ok(bytes)
}

/// Stored name for the i-th input of a job.
fn stored_input_name(index: usize, original: &str) -> String {
    let mut safe = sanitize_filename(original);
    if safe.is_empty() {
        safe = "upload.wav".to_owned();
    }
    // Keep the tail so the extension survives; names are ASCII after
    // sanitization.
    if safe.len() > 64 {
        safe = safe[safe.len() - 64..].to_owned();
    }
    format!("input_{index}_{safe}")
}

/// Persist validated uploads, create the job record, and start execution.
async fn create_job(
    state: &AppState,
    kind: JobKind,
    files: Vec<Upload>,
) -> Result<Json<JobCreatedResponse>, ServerError> {
    let job_id = JobId::generate();

    let mut inputs = Vec::with_capacity(files.len());
    for (i, upload) in files.iter().enumerate() {
        let name = stored_input_name(i, &upload.file_name);
        match state.store.write(&job_id, &name, &upload.bytes).await {
            Ok(artifact) => inputs.push(artifact),
            Err(e) => {
                // Roll back whatever landed so a failed intake leaves no
                // orphaned namespace; no job record exists yet.
                warn!(job_id = %job_id, error = %e, "intake persist failed; rolling back");
                if let Err(re) = state.store.remove_job(&job_id).await {
                    warn!(job_id = %job_id, error = %re, "intake rollback failed");
                }
                return Err(ServerError::Internal(e.to_string()));
            }
        }
    }

    let job = state.registry.create(job_id, kind, inputs);
    state.executor.spawn(job.id.clone());

    info!(
        job_id = %job.id,
        kind = job.kind.as_str(),
        files = files.len(),
        "job accepted"
    );
    Ok(Json(JobCreatedResponse {
        job_id: job.id.to_string(),
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use audiosplit_core::audio::{self, Waveform};
    use audiosplit_core::engine::{SeparationEngine, Stem};
    use audiosplit_core::{ArtifactStore, EngineError, JobRegistry, PipelineExecutor, StatusService};

    use super::*;
    use crate::config::Config;

    /// Engine that "separates" any input into four constant stems,
    /// optionally after a fixed delay.
    struct StubEngine {
        delay: Duration,
    }

    #[async_trait]
    impl SeparationEngine for StubEngine {
        async fn separate(
            &self,
            _input: &std::path::Path,
        ) -> Result<HashMap<Stem, Waveform>, EngineError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let stem = |samples: &[f32]| Waveform {
                sample_rate: 44_100,
                channels: 2,
                samples: samples.to_vec(),
            };
            let mut stems = HashMap::new();
            stems.insert(Stem::Vocals, stem(&[0.1, 0.1, 0.1, 0.1]));
            stems.insert(Stem::Drums, stem(&[0.2, 0.0, 0.2, 0.0]));
            stems.insert(Stem::Bass, stem(&[0.0, 0.2, 0.0, 0.2]));
            stems.insert(Stem::Other, stem(&[0.1, 0.3, 0.1, 0.3]));
            Ok(stems)
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".into(),
            data_dir: String::new(),
            max_upload_mb: 1,
            max_batch_files: 16,
            worker_slots: 2,
            job_timeout_secs: 10,
            log_level: "info".into(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: false,
            demucs_bin: "demucs".into(),
            demucs_model: "htdemucs".into(),
        }
    }

    fn app() -> (tempfile::TempDir, axum::Router) {
        app_with_delay(Duration::ZERO)
    }

    fn app_with_delay(delay: Duration) -> (tempfile::TempDir, axum::Router) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Arc::new(test_config());
        let registry = Arc::new(JobRegistry::new());
        let store = ArtifactStore::new(dir.path());
        let executor = PipelineExecutor::new(
            Arc::clone(&registry),
            store.clone(),
            Arc::new(StubEngine { delay }),
            config.worker_slots,
            Duration::from_secs(config.job_timeout_secs),
        );
        let status = StatusService::new(Arc::clone(&registry), store.clone());
        let state = Arc::new(AppState {
            config,
            registry,
            store,
            executor,
            status,
        });
        (dir, crate::routes::build(state))
    }

    const BOUNDARY: &str = "test-boundary-7MA4YWxk";

    fn multipart_body(parts: &[(&str, &str, &[u8])]) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for (field, filename, bytes) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"{field}\"; filename=\"{filename}\"\r\n\
                     Content-Type: audio/wav\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (format!("multipart/form-data; boundary={BOUNDARY}"), body)
    }

    fn wav_bytes(samples: &[f32]) -> Vec<u8> {
        audio::encode_wav(&Waveform {
            sample_rate: 44_100,
            channels: 2,
            samples: samples.to_vec(),
        })
        .expect("encode")
    }

    async fn post_multipart(
        app: &axum::Router,
        path: &str,
        parts: &[(&str, &str, &[u8])],
    ) -> (StatusCode, serde_json::Value) {
        let (content_type, body) = multipart_body(parts);
        let response = app
            .clone()
            .oneshot(
                Request::post(path)
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn get_json(app: &axum::Router, path: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn get_bytes(app: &axum::Router, path: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn poll_until_done(app: &axum::Router, job_id: &str) -> serde_json::Value {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let (status, body) = get_json(app, &format!("/api/status/{job_id}")).await;
                assert_eq!(status, StatusCode::OK);
                match body["status"].as_str() {
                    Some("done") | Some("error") => break body,
                    _ => tokio::time::sleep(Duration::from_millis(10)).await,
                }
            }
        })
        .await
        .expect("job should reach a terminal status")
    }

    #[tokio::test]
    async fn status_of_unknown_job_is_404() {
        let (_dir, app) = app();
        let (status, body) = get_json(&app, "/api/status/deadbeef").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn mix_with_one_file_is_rejected_without_creating_a_job() {
        let (_dir, app) = app();
        let wav = wav_bytes(&[0.0; 4]);
        let (status, body) =
            post_multipart(&app, "/api/mix", &[("files", "one.wav", &wav)]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("at least 2"));
        assert!(body.get("job_id").is_none());
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let (_dir, app) = app();
        let (status, body) =
            post_multipart(&app, "/api/upload", &[("file", "song.flac", b"junk")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains(".mp3 and .wav"));
    }

    #[tokio::test]
    async fn upload_with_no_file_is_rejected() {
        let (_dir, app) = app();
        let (content_type, body) = multipart_body(&[]);
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/upload")
                    .header(header::CONTENT_TYPE, content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn separation_flow_yields_four_downloadable_stems() {
        let (_dir, app) = app();
        let wav = wav_bytes(&[0.4, 0.4, 0.4, 0.4]);
        let (status, body) =
            post_multipart(&app, "/api/upload", &[("file", "song.wav", &wav)]).await;
        assert_eq!(status, StatusCode::OK);
        let job_id = body["job_id"].as_str().expect("job id").to_owned();

        let done = poll_until_done(&app, &job_id).await;
        assert_eq!(done["status"], "done");
        let stems: Vec<&str> = done["stems"]
            .as_array()
            .expect("stems list")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(stems, vec!["bass", "drums", "other", "vocals"]);

        for stem in stems {
            let (status, bytes) =
                get_bytes(&app, &format!("/api/download/{job_id}/{stem}.wav")).await;
            assert_eq!(status, StatusCode::OK);
            // Each stem must decode as valid audio on its own.
            let wave = audio::decode_wav(&bytes).expect("stem decodes");
            assert_eq!(wave.sample_rate, 44_100);
        }

        // Idempotent read: repeated downloads are byte-identical.
        let (_, first) = get_bytes(&app, &format!("/api/download/{job_id}/vocals.wav")).await;
        let (_, second) = get_bytes(&app, &format!("/api/download/{job_id}/vocals.wav")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn mix_flow_produces_the_sample_wise_sum() {
        let (_dir, app) = app();
        let a = [0.1f32, 0.2, 0.3, 0.4];
        let b = [0.3f32, 0.2, 0.1, 0.0];
        let c = [0.2f32, 0.2, 0.2, 0.2];
        let (wa, wb, wc) = (wav_bytes(&a), wav_bytes(&b), wav_bytes(&c));
        let (status, body) = post_multipart(
            &app,
            "/api/mix",
            &[
                ("files", "a.wav", &wa),
                ("files", "b.wav", &wb),
                ("files", "c.wav", &wc),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let job_id = body["job_id"].as_str().unwrap().to_owned();

        let done = poll_until_done(&app, &job_id).await;
        assert_eq!(done["status"], "done");

        let (status, bytes) = get_bytes(&app, &format!("/api/download_mixed/{job_id}")).await;
        assert_eq!(status, StatusCode::OK);
        let mixed = audio::decode_wav(&bytes).expect("mix decodes");
        for i in 0..4 {
            let want = a[i] + b[i] + c[i];
            assert!((mixed.samples[i] - want).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn karaoke_flow_serves_the_instrumental() {
        // Slow engine: the job is reliably unfinished for the early check.
        let (_dir, app) = app_with_delay(Duration::from_secs(1));
        let wav = wav_bytes(&[0.4, 0.4, 0.4, 0.4]);
        let (status, body) =
            post_multipart(&app, "/api/karaoke", &[("file", "song.wav", &wav)]).await;
        assert_eq!(status, StatusCode::OK);
        let job_id = body["job_id"].as_str().unwrap().to_owned();

        // Download before completion must not leak partial results.
        let (early, _) = get_bytes(&app, &format!("/api/download_karaoke/{job_id}")).await;
        assert_eq!(early, StatusCode::NOT_FOUND);

        let done = poll_until_done(&app, &job_id).await;
        assert_eq!(done["status"], "done");
        assert_eq!(done["stems"].as_array().unwrap().len(), 1);

        let (status, bytes) = get_bytes(&app, &format!("/api/download_karaoke/{job_id}")).await;
        assert_eq!(status, StatusCode::OK);
        // Stub stems: drums + bass + other, vocals discarded.
        let karaoke = audio::decode_wav(&bytes).expect("karaoke decodes");
        for (i, want) in [0.3f32, 0.5, 0.3, 0.5].iter().enumerate() {
            assert!((karaoke.samples[i] - want).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let (_dir, app) = app();
        // max_upload_mb = 1 in the test config.
        let huge = vec![0u8; 1024 * 1024 + 1];
        let (status, body) =
            post_multipart(&app, "/api/upload", &[("file", "big.wav", &huge)]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("too large"));
    }

    #[tokio::test]
    async fn mix_accepts_many_near_limit_files_in_one_request() {
        let (_dir, app) = app();
        // ~0.9 MB per file against the 1 MB per-file cap; five of them
        // only fit because the request budget scales with the configured
        // batch size, not a hardcoded file count.
        let wav = wav_bytes(&vec![0.01f32; 230_000]);
        let names: Vec<String> = (0..5).map(|i| format!("track_{i}.wav")).collect();
        let parts: Vec<(&str, &str, &[u8])> = names
            .iter()
            .map(|n| ("files", n.as_str(), wav.as_slice()))
            .collect();

        let (status, body) = post_multipart(&app, "/api/mix", &parts).await;
        assert_eq!(status, StatusCode::OK);
        let job_id = body["job_id"].as_str().expect("job id").to_owned();

        let done = poll_until_done(&app, &job_id).await;
        assert_eq!(done["status"], "done");
    }

    #[test]
    fn stored_input_names_are_safe_and_distinct() {
        let a = stored_input_name(0, "my song (live).wav");
        let b = stored_input_name(1, "my song (live).wav");
        assert_ne!(a, b);
        assert!(audiosplit_core::store::validate_name(&a).is_ok());

        let traversal = stored_input_name(0, "../../etc/passwd.wav");
        assert!(audiosplit_core::store::validate_name(&traversal).is_ok());
    }
}
