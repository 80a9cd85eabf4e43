//! In-memory project store for tests and ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reel_models::{Project, ProjectId};

use crate::error::StoreResult;
use crate::store::ProjectStore;

/// Non-durable store backed by a map. Same semantics as the JSON store,
/// minus the disk.
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    records: RwLock<HashMap<String, Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn get(&self, id: &ProjectId) -> StoreResult<Option<Project>> {
        Ok(self.records.read().await.get(id.as_str()).cloned())
    }

    async fn upsert(&self, project: &Project) -> StoreResult<()> {
        self.records
            .write()
            .await
            .insert(project.id.as_str().to_string(), project.clone());
        Ok(())
    }
}
