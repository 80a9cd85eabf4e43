//! Store contract.

use async_trait::async_trait;

use reel_models::{Project, ProjectId};

use crate::error::StoreResult;

/// Keyed, durable storage for project records.
///
/// `get`/`upsert` is the whole contract: every update is a read-modify-write
/// of the full record, and callers guarantee a single writer per project id.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Load a record, or `None` when the id is unknown.
    async fn get(&self, id: &ProjectId) -> StoreResult<Option<Project>>;

    /// Insert or replace the record under its id.
    async fn upsert(&self, project: &Project) -> StoreResult<()>;
}
