use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

/// What a write produced: where it landed, how big it was, and the digest
/// downstream consumers can verify against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReceipt {
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: String,
}

/// Serializes `value` as pretty JSON at `path`, creating missing parent
/// directories. An existing file is overwritten.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<ArtifactReceipt> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, &text)?;
    debug!(path = %path.display(), bytes = text.len(), "wrote artifact");
    Ok(ArtifactReceipt {
        path: path.to_path_buf(),
        bytes: text.len(),
        sha256: hash_bytes(text.as_bytes()),
    })
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Provenance record written beside a pipeline run's artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub drugs: usize,
    pub publications: usize,
    pub clinical_trials: usize,
    pub rejected: usize,
    pub artifacts: Vec<ArtifactReceipt>,
}

impl RunManifest {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            generated_at: Utc::now(),
            drugs: 0,
            publications: 0,
            clinical_trials: 0,
            rejected: 0,
            artifacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_counts(
        mut self,
        drugs: usize,
        publications: usize,
        clinical_trials: usize,
        rejected: usize,
    ) -> Self {
        self.drugs = drugs;
        self.publications = publications;
        self.clinical_trials = clinical_trials;
        self.rejected = rejected;
        self
    }

    pub fn record_artifact(&mut self, receipt: ArtifactReceipt) {
        self.artifacts.push(receipt);
    }
}

impl Default for RunManifest {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOp {
    Push,
    Pull,
}

impl TransferOp {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pull => "pull",
        }
    }
}

impl std::fmt::Display for TransferOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seam between the pipeline and wherever run artifacts get mirrored.
pub trait ObjectStore {
    fn put(&self, local: &Path, key: &str) -> Result<()>;
    fn get(&self, key: &str, local: &Path) -> Result<()>;
}

/// Bucket laid out as a plain directory tree; keys are relative paths.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ObjectStore for DirStore {
    fn put(&self, local: &Path, key: &str) -> Result<()> {
        let target = self.object_path(key);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(local, &target)?;
        Ok(())
    }

    fn get(&self, key: &str, local: &Path) -> Result<()> {
        if let Some(parent) = local.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(self.object_path(key), local)?;
        Ok(())
    }
}

pub fn transfer(op: TransferOp, store: &dyn ObjectStore, local: &Path, key: &str) -> Result<()> {
    debug!(op = %op, local = %local.display(), key, "object transfer");
    match op {
        TransferOp::Push => store.put(local, key),
        TransferOp::Pull => store.get(key, local),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::{Drug, ReconciledDrug};

    #[test]
    fn save_json_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("reconciled.json");

        let first = save_json(&path, &vec![1, 2, 3]).unwrap();
        let second = save_json(&path, &vec![4]).unwrap();
        assert_ne!(first.sha256, second.sha256);

        let written: Vec<i64> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, vec![4]);
    }

    #[test]
    fn receipt_hash_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        let reconciled = ReconciledDrug::empty(Drug {
            code: "A03BA".to_string(),
            name: "ATROPINE".to_string(),
        });

        let one = save_json(&dir.path().join("a.json"), &reconciled).unwrap();
        let two = save_json(&dir.path().join("b.json"), &reconciled).unwrap();
        assert_eq!(one.sha256, two.sha256);
        assert_eq!(one.sha256.len(), 64);
        assert_eq!(one.bytes, fs::metadata(dir.path().join("a.json")).unwrap().len() as usize);
    }

    #[test]
    fn manifest_round_trips() {
        let mut manifest = RunManifest::new().with_counts(7, 12, 7, 1);
        manifest.record_artifact(ArtifactReceipt {
            path: PathBuf::from("out/reconciled.json"),
            bytes: 42,
            sha256: "00".repeat(32),
        });

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["drugs"], 7);
        assert_eq!(value["rejected"], 1);
        let back: RunManifest = serde_json::from_value(value).unwrap();
        assert_eq!(back.id, manifest.id);
        assert_eq!(back.artifacts.len(), 1);
    }

    #[test]
    fn dir_store_round_trips_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = DirStore::new(dir.path().join("bucket"));

        let local = dir.path().join("reconciled.json");
        fs::write(&local, b"{\"ok\": true}").unwrap();
        transfer(TransferOp::Push, &bucket, &local, "runs/2020/reconciled.json").unwrap();

        let fetched = dir.path().join("fetched.json");
        transfer(TransferOp::Pull, &bucket, &fetched, "runs/2020/reconciled.json").unwrap();
        assert_eq!(fs::read(&fetched).unwrap(), fs::read(&local).unwrap());
    }

    #[test]
    fn pull_of_missing_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let bucket = DirStore::new(dir.path().join("bucket"));
        let err = bucket
            .get("absent.json", &dir.path().join("local.json"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
