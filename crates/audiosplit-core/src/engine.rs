//! Separation engine adapter.
//!
//! The engine itself is an external black box (Demucs). This module pins
//! down its contract at the boundary: a fixed, closed stem set, validated
//! on every call, so the rest of the pipeline never has to trust the shape
//! of engine output.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::audio::{self, Waveform};
use crate::error::EngineError;

/// The fixed set of stems a separation run must produce.
///
/// Modeled as a closed enum rather than engine-reported strings so that a
/// drifting engine surfaces as a validation error at the adapter boundary,
/// not as a surprise at a use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stem {
    Vocals,
    Drums,
    Bass,
    Other,
}

impl Stem {
    pub const ALL: [Stem; 4] = [Stem::Vocals, Stem::Drums, Stem::Bass, Stem::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stem::Vocals => "vocals",
            Stem::Drums => "drums",
            Stem::Bass => "bass",
            Stem::Other => "other",
        }
    }

    /// Output file name for this stem inside a job's namespace.
    pub fn file_name(&self) -> String {
        format!("{}.wav", self.as_str())
    }

    pub fn from_str(s: &str) -> Option<Stem> {
        match s {
            "vocals" => Some(Stem::Vocals),
            "drums" => Some(Stem::Drums),
            "bass" => Some(Stem::Bass),
            "other" => Some(Stem::Other),
            _ => None,
        }
    }
}

/// Black-box separation primitive: one mixed recording in, one waveform
/// per stem out. Implementations may take minutes and may fail.
#[async_trait]
pub trait SeparationEngine: Send + Sync {
    async fn separate(&self, input: &Path) -> Result<HashMap<Stem, Waveform>, EngineError>;
}

/// Verify an engine result against the fixed expected set.
///
/// Both missing and unexpected stems fail the call; a partial stem set is
/// never allowed to reach a `Done` job.
pub fn validate_stems(stems: &HashMap<Stem, Waveform>) -> Result<(), EngineError> {
    let missing: Vec<&'static str> = Stem::ALL
        .iter()
        .filter(|s| !stems.contains_key(s))
        .map(|s| s.as_str())
        .collect();
    // With a closed key type, "unexpected" can only mean too many entries;
    // guard anyway so a future key-type change cannot weaken the check.
    let unexpected: Vec<String> = if stems.len() > Stem::ALL.len() {
        vec![format!("{} extra entries", stems.len() - Stem::ALL.len())]
    } else {
        Vec::new()
    };

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(EngineError::IncompleteStems { missing, unexpected })
    }
}

/// Production adapter: shells out to the `demucs` CLI.
///
/// Demucs writes `<out>/<model>/<track>/<stem>.wav`; the adapter runs it
/// against a scratch directory, decodes each expected stem, validates the
/// set, and removes the scratch directory again.
#[derive(Debug, Clone)]
pub struct DemucsEngine {
    binary: String,
    model: String,
    timeout: Duration,
}

impl DemucsEngine {
    pub fn new(binary: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            timeout,
        }
    }

    fn scratch_dir(&self) -> PathBuf {
        std::env::temp_dir().join(format!("audiosplit_demucs_{}", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl SeparationEngine for DemucsEngine {
    async fn separate(&self, input: &Path) -> Result<HashMap<Stem, Waveform>, EngineError> {
        let scratch = self.scratch_dir();
        let result = run_demucs(&self.binary, &self.model, self.timeout, input, &scratch).await;
        // Scratch cleanup is best-effort; leftovers only waste temp space.
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %scratch.display(), error = %e, "failed to remove demucs scratch dir");
            }
        }
        result
    }
}

async fn run_demucs(
    binary: &str,
    model: &str,
    timeout: Duration,
    input: &Path,
    scratch: &Path,
) -> Result<HashMap<Stem, Waveform>, EngineError> {
    debug!(input = %input.display(), model, "starting demucs separation");

    let mut cmd = Command::new(binary);
    cmd.arg("-n")
        .arg(model)
        .arg("-o")
        .arg(scratch)
        .arg(input)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        EngineError::Invocation(format!(
            "failed to start '{binary}'; is it installed and in PATH? {e}"
        ))
    })?;

    // Demucs reports progress on stderr; forward it to the logs.
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| EngineError::Invocation("demucs stderr not available".into()))?;
    let stderr_task = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            trace!(demucs_stderr = %line, "demucs log");
        }
    });

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return Err(EngineError::Invocation(format!(
                "failed to wait for demucs process: {e}"
            )));
        }
        Err(_) => {
            let _ = child.kill().await;
            return Err(EngineError::Timeout {
                seconds: timeout.as_secs(),
            });
        }
    };
    let _ = stderr_task.await;

    if !status.success() {
        return Err(EngineError::Invocation(format!(
            "demucs exited with status {}",
            status.code().unwrap_or(-1)
        )));
    }

    // demucs names the track directory after the input file stem.
    let track = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("track");
    let track_dir = scratch.join(model).join(track);

    let mut stems = HashMap::new();
    for stem in Stem::ALL {
        let path = track_dir.join(stem.file_name());
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(EngineError::OutputUnreadable {
                    stem: stem.as_str().to_owned(),
                    message: e.to_string(),
                });
            }
        };
        let waveform = audio::decode_wav(&bytes).map_err(|e| EngineError::OutputUnreadable {
            stem: stem.as_str().to_owned(),
            message: e.to_string(),
        })?;
        stems.insert(stem, waveform);
    }

    validate_stems(&stems)?;
    info!(
        input = %input.display(),
        frames = stems.values().next().map(|w| w.duration_frames()).unwrap_or(0),
        "demucs separation completed"
    );
    Ok(stems)
}
