//! Filesystem artifact store.
//!
//! One directory per job id under a configured root; artifacts are
//! addressed by (job id, sanitized file name). The store is the only
//! component that owns file bytes — jobs hold [`ArtifactRef`]s, never
//! copies. Writes within one job come from exactly one pipeline run, so
//! the only write conflict the store must handle is the double write of a
//! single name, which it rejects.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::StoreError;
use crate::job::{ArtifactRef, JobId};

/// Maximum accepted length for a logical artifact name.
const MAX_NAME_LEN: usize = 128;

/// Validate a logical artifact name against the safe character set.
///
/// Allowed: ASCII alphanumerics, `.`, `_`, `-`. A leading dot is rejected
/// (hides files, and `..` would escape the namespace). Everything else is
/// rejected outright rather than being rewritten, so a reference's name
/// always round-trips exactly.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_owned()))
    }
}

/// Rewrite an untrusted client file name into the safe character set.
///
/// Used at intake for names we do not control; internal logical names are
/// expected to pass [`validate_name`] unchanged.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_owned()
}

/// Artifact store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn job_dir(&self, job: &JobId) -> PathBuf {
        self.root.join(job.as_str())
    }

    /// Absolute path of an artifact. The reference's name was validated at
    /// write time, so the join cannot escape the job directory.
    pub fn path_of(&self, artifact: &ArtifactRef) -> PathBuf {
        self.job_dir(&artifact.job).join(&artifact.name)
    }

    /// Write `bytes` as a new artifact and return its reference.
    ///
    /// Rejects a second write of the same (job, name) with
    /// [`StoreError::AlreadyExists`].
    pub async fn write(
        &self,
        job: &JobId,
        name: &str,
        bytes: &[u8],
    ) -> Result<ArtifactRef, StoreError> {
        validate_name(name)?;

        let dir = self.job_dir(job);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(name);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists {
                    job: job.clone(),
                    name: name.to_owned(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!(job_id = %job, name, size_bytes = bytes.len(), "artifact written");
        Ok(ArtifactRef {
            job: job.clone(),
            name: name.to_owned(),
        })
    }

    /// Read an artifact's bytes.
    pub async fn read(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(artifact);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                job: artifact.job.clone(),
                name: artifact.name.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, artifact: &ArtifactRef) -> bool {
        tokio::fs::try_exists(self.path_of(artifact))
            .await
            .unwrap_or(false)
    }

    /// Remove a job's entire namespace. Used by intake to roll back a
    /// partially persisted upload set; missing directories are not an error.
    pub async fn remove_job(&self, job: &JobId) -> Result<(), StoreError> {
        match tokio::fs::remove_dir_all(self.job_dir(job)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let (_dir, store) = store();
        let job = JobId::generate();
        let r = store.write(&job, "mixed.wav", b"abc").await.expect("write");
        assert_eq!(store.read(&r).await.expect("read"), b"abc");
        assert!(store.exists(&r).await);
    }

    #[tokio::test]
    async fn double_write_is_rejected() {
        let (_dir, store) = store();
        let job = JobId::generate();
        store.write(&job, "vocals.wav", b"a").await.expect("first");
        let err = store.write(&job, "vocals.wav", b"b").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
        // First write is untouched.
        let r = ArtifactRef {
            job,
            name: "vocals.wav".into(),
        };
        assert_eq!(store.read(&r).await.expect("read"), b"a");
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let (_dir, store) = store();
        let job = JobId::generate();
        for bad in ["../escape.wav", "..", "", "a/b.wav", ".hidden", "nul\0"] {
            let err = store.write(&job, bad, b"x").await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidName(_)), "name {bad:?}");
        }
    }

    #[tokio::test]
    async fn jobs_do_not_collide() {
        let (_dir, store) = store();
        let a = JobId::generate();
        let b = JobId::generate();
        store.write(&a, "out.wav", b"aaa").await.expect("a");
        store.write(&b, "out.wav", b"bbb").await.expect("b");
        let ra = ArtifactRef { job: a, name: "out.wav".into() };
        let rb = ArtifactRef { job: b, name: "out.wav".into() };
        assert_eq!(store.read(&ra).await.unwrap(), b"aaa");
        assert_eq!(store.read(&rb).await.unwrap(), b"bbb");
    }

    #[tokio::test]
    async fn remove_job_rolls_back_namespace() {
        let (_dir, store) = store();
        let job = JobId::generate();
        let r = store.write(&job, "input.wav", b"x").await.expect("write");
        store.remove_job(&job).await.expect("remove");
        assert!(!store.exists(&r).await);
        // Removing again is a no-op.
        store.remove_job(&job).await.expect("remove twice");
    }

    #[test]
    fn sanitize_rewrites_unsafe_characters() {
        assert_eq!(sanitize_filename("my song (1).wav"), "my_song__1_.wav");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
    }
}
