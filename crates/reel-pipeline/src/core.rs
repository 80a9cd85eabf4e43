//! The core surface: submit projects, start runs, poll, fetch assets.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use reel_media::MediaEngine;
use reel_models::{Project, ProjectId, ProjectSource, ProjectStatus};
use reel_store::ProjectStore;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::runner::{self, PipelineContext};
use crate::runs::RunTracker;
use crate::script_job;

/// What polling returns: the observable slice of a project record.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub progress: u8,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry point for everything callers do with projects.
///
/// Owns the store, the media engine, and the run tracker; every run spawned
/// from here shares them through one [`PipelineContext`].
pub struct Reelsmith {
    ctx: Arc<PipelineContext>,
    runs: Arc<RunTracker>,
}

impl Reelsmith {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        engine: Arc<dyn MediaEngine>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            ctx: Arc::new(PipelineContext::new(store, engine, config)),
            runs: Arc::new(RunTracker::new()),
        }
    }

    /// Create an idle project for a source and persist it.
    ///
    /// Script sources are validated here, synchronously: a script with no
    /// non-blank lines or a non-positive per-line duration never becomes a
    /// record.
    pub async fn submit(&self, source: ProjectSource) -> PipelineResult<ProjectId> {
        if let ProjectSource::Script {
            script,
            per_line_secs,
            ..
        } = &source
        {
            if script_job::script_lines(script).is_empty() {
                return Err(PipelineError::input("Script has no non-blank lines"));
            }
            if !per_line_secs.is_finite() || *per_line_secs <= 0.0 {
                return Err(PipelineError::input("per_line_secs must be a positive number"));
            }
        }

        let project = Project::new(source);
        self.ctx.store.upsert(&project).await?;
        info!(project_id = %project.id, "Project submitted");
        Ok(project.id)
    }

    /// Start the background run for an idle project.
    ///
    /// Exactly one run per project, ever: a processing or terminal record,
    /// or an id already registered with the tracker, answers
    /// [`PipelineError::AlreadyStarted`].
    pub async fn start_run(&self, id: &ProjectId) -> PipelineResult<()> {
        let project = self
            .ctx
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.as_str()))?;

        if project.status != ProjectStatus::Idle {
            return Err(PipelineError::already_started(id.as_str()));
        }
        if !self.runs.try_begin(id.as_str()).await {
            return Err(PipelineError::already_started(id.as_str()));
        }

        info!(project_id = %id, "Run accepted");
        let ctx = Arc::clone(&self.ctx);
        let runs = Arc::clone(&self.runs);
        let run_id = id.clone();
        tokio::spawn(async move {
            runner::run_project(&ctx, &run_id).await;
            runs.finish(run_id.as_str()).await;
        });

        Ok(())
    }

    /// Current progress, status, and error (if any) for a project.
    pub async fn poll_status(&self, id: &ProjectId) -> PipelineResult<StatusSnapshot> {
        let project = self
            .ctx
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.as_str()))?;

        Ok(StatusSnapshot {
            progress: project.progress,
            status: project.status,
            error: project.error,
        })
    }

    /// Path of the finished asset; [`PipelineError::NotReady`] until the
    /// project is done.
    pub async fn fetch_asset(&self, id: &ProjectId) -> PipelineResult<PathBuf> {
        let project = self
            .ctx
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found(id.as_str()))?;

        match (project.status, project.output_path) {
            (ProjectStatus::Done, Some(path)) => Ok(PathBuf::from(path)),
            _ => Err(PipelineError::not_ready(id.as_str())),
        }
    }
}
