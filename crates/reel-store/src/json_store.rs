//! JSON-file-backed project store.
//!
//! One JSON document per project id under the store root. Writes go through
//! a temp file and a rename so a crash mid-write never leaves a truncated
//! record behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use reel_models::{Project, ProjectId};

use crate::error::{StoreError, StoreResult};
use crate::store::ProjectStore;

/// Durable store keeping `{root}/{project_id}.json` documents.
#[derive(Debug, Clone)]
pub struct JsonProjectStore {
    root: PathBuf,
}

impl JsonProjectStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(StoreError::invalid_root("empty store path"));
        }
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, id: &ProjectId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

#[async_trait]
impl ProjectStore for JsonProjectStore {
    async fn get(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        let path = self.record_path(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let project = serde_json::from_slice(&bytes)?;
        Ok(Some(project))
    }

    async fn upsert(&self, project: &Project) -> StoreResult<()> {
        let path = self.record_path(&project.id);
        let tmp = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(project)?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(
            project_id = %project.id,
            status = %project.status,
            progress = project.progress,
            "Persisted project record"
        );
        Ok(())
    }
}
