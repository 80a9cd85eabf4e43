//! Highlight-run orchestration.
//!
//! One background task drives a project from `processing` to a terminal
//! state through strictly sequential stages: acquire (remote sources),
//! probe, transcript, segment derivation, selection, per-highlight render,
//! concatenation. Progress moves through fixed checkpoints (1, 5, 15, 45),
//! interpolates 45..85 while clips render, then 90 and 100. Any stage
//! failure is caught once in [`run_project`], stringified, and recorded on
//! the project; there are no retries.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{error, info, warn};

use reel_media::MediaEngine;
use reel_models::{Project, ProjectId, ProjectSource};
use reel_store::ProjectStore;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::script_job;
use crate::segments;
use crate::select;

pub const METRIC_RUNS_STARTED: &str = "reelsmith_runs_started_total";
pub const METRIC_RUNS_COMPLETED: &str = "reelsmith_runs_completed_total";
pub const METRIC_RUNS_FAILED: &str = "reelsmith_runs_failed_total";
pub const METRIC_RUN_SECONDS: &str = "reelsmith_run_duration_seconds";
pub const METRIC_RENDER_SECONDS: &str = "reelsmith_render_duration_seconds";

const PROGRESS_STARTED: u8 = 1;
const PROGRESS_ACQUIRED: u8 = 5;
const PROGRESS_ANALYZED: u8 = 15;
const PROGRESS_SELECTED: u8 = 45;
/// Render progress interpolates across this span, ending at 85.
const RENDER_SPAN: usize = 40;
const PROGRESS_CONCATENATED: u8 = 90;

/// Everything a run needs: the record store, the media boundary, and config.
pub struct PipelineContext {
    pub store: Arc<dyn ProjectStore>,
    pub engine: Arc<dyn MediaEngine>,
    pub config: PipelineConfig,
}

impl PipelineContext {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        engine: Arc<dyn MediaEngine>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }
}

/// Drive one project run to a terminal state.
///
/// This is the body of the spawned run task: it never returns an error,
/// it records the outcome on the project instead.
pub async fn run_project(ctx: &PipelineContext, id: &ProjectId) {
    counter!(METRIC_RUNS_STARTED).increment(1);
    let started = Instant::now();

    let outcome = execute_run(ctx, id).await;
    let run_secs = started.elapsed().as_secs_f64();

    match outcome {
        Ok(output) => {
            counter!(METRIC_RUNS_COMPLETED).increment(1);
            histogram!(METRIC_RUN_SECONDS).record(run_secs);
            info!(project_id = %id, run_secs, output = %output.display(), "Run completed");
        }
        Err(e) => {
            counter!(METRIC_RUNS_FAILED).increment(1);
            error!(project_id = %id, run_secs, error = %e, "Run failed");
            record_failure(ctx, id, &e.to_string()).await;
        }
    }
}

async fn execute_run(ctx: &PipelineContext, id: &ProjectId) -> PipelineResult<PathBuf> {
    let project = ctx
        .store
        .get(id)
        .await?
        .ok_or_else(|| PipelineError::not_found(id.as_str()))?;

    if project.source.is_script() {
        script_job::run_script(ctx, project).await
    } else {
        run_highlights(ctx, project).await
    }
}

/// Record a stringified failure on the project. Store errors at this point
/// can only be logged; the run is already lost.
async fn record_failure(ctx: &PipelineContext, id: &ProjectId, message: &str) {
    match ctx.store.get(id).await {
        Ok(Some(project)) => {
            if let Err(e) = ctx.store.upsert(&project.fail(message)).await {
                error!(project_id = %id, error = %e, "Failed to persist run failure");
            }
        }
        Ok(None) => {}
        Err(e) => error!(project_id = %id, error = %e, "Failed to load project for failure record"),
    }
}

/// Persist a progress checkpoint and hand the updated record back.
pub(crate) async fn checkpoint(
    ctx: &PipelineContext,
    project: Project,
    progress: u8,
) -> PipelineResult<Project> {
    let updated = project.with_progress(progress);
    ctx.store.upsert(&updated).await?;
    Ok(updated)
}

async fn run_highlights(ctx: &PipelineContext, project: Project) -> PipelineResult<PathBuf> {
    let id = project.id.clone();
    let source = project.source.clone();
    info!(project_id = %id, "Starting highlight run");

    let mut project = project.start().with_progress(PROGRESS_STARTED);
    ctx.store.upsert(&project).await?;

    let work_dir = PathBuf::from(&ctx.config.work_dir).join(id.as_str());
    tokio::fs::create_dir_all(&work_dir).await?;

    // Resolve the source to local media.
    let (local_path, remote_ref) = match source {
        ProjectSource::File { path } => {
            let local = PathBuf::from(&path);
            if !local.exists() {
                return Err(PipelineError::input(format!("Source file not found: {path}")));
            }
            (local, None)
        }
        ProjectSource::Remote { remote_ref } => {
            info!(project_id = %id, stage = "acquire", "Acquiring remote source");
            let local = ctx
                .engine
                .acquire(&remote_ref, &work_dir)
                .await
                .map_err(|e| PipelineError::acquisition(e.to_string()))?;
            project = checkpoint(ctx, project, PROGRESS_ACQUIRED).await?;
            (local, Some(remote_ref))
        }
        ProjectSource::Script { .. } => {
            return Err(PipelineError::input("Script sources run through the synthesizer"));
        }
    };

    // Probe failures degrade to an unknown duration.
    let duration = match ctx.engine.probe_duration(&local_path).await {
        Ok(d) => d,
        Err(e) => {
            warn!(project_id = %id, stage = "probe", error = %e, "Probe failed, duration unknown");
            0.0
        }
    };
    if duration > 0.0 {
        project.meta.duration_secs = Some(duration);
    }
    project = checkpoint(ctx, project, PROGRESS_ANALYZED).await?;

    let transcript = match &remote_ref {
        Some(remote_ref) => ctx.engine.fetch_transcript(remote_ref, &work_dir).await,
        None => Vec::new(),
    };
    if transcript.is_empty() {
        info!(project_id = %id, stage = "transcript", "No transcript, falling back to time buckets");
    }

    let candidates = segments::derive_segments(transcript, duration);
    if candidates.is_empty() {
        return Err(PipelineError::input(
            "No transcript and unknown source duration, nothing to select from",
        ));
    }

    info!(project_id = %id, stage = "select", candidates = candidates.len(), "Selecting highlights");
    let highlights = select::select(&candidates, ctx.config.highlight_count);
    if highlights.is_empty() {
        return Err(PipelineError::input("Highlight selection produced no windows"));
    }
    project.meta.highlight_count = Some(highlights.len());
    project = checkpoint(ctx, project, PROGRESS_SELECTED).await?;

    // Render clips sequentially; the first failure aborts the run.
    let clips_dir = work_dir.join("clips");
    tokio::fs::create_dir_all(&clips_dir).await?;

    let total = highlights.len();
    let mut clip_paths = Vec::with_capacity(total);
    for (index, highlight) in highlights.iter().enumerate() {
        info!(
            project_id = %id,
            stage = "render",
            clip = index + 1,
            total,
            start = highlight.start,
            end = highlight.end,
            "Rendering clip"
        );
        let clip_path = clips_dir.join(format!("clip_{index:02}.mp4"));
        let render_started = Instant::now();
        let rendered = ctx
            .engine
            .render_clip(&local_path, highlight.start, highlight.end, &clip_path)
            .await
            .map_err(|e| PipelineError::render(e.to_string()))?;
        histogram!(METRIC_RENDER_SECONDS).record(render_started.elapsed().as_secs_f64());
        clip_paths.push(rendered);

        let progress = PROGRESS_SELECTED + ((index + 1) * RENDER_SPAN / total) as u8;
        project = checkpoint(ctx, project, progress).await?;
    }

    info!(project_id = %id, stage = "concat", clips = clip_paths.len(), "Concatenating clips");
    let final_path = work_dir.join("final.mp4");
    let output = ctx
        .engine
        .concat(&clip_paths, &final_path)
        .await
        .map_err(|e| PipelineError::render(e.to_string()))?;
    project = checkpoint(ctx, project, PROGRESS_CONCATENATED).await?;

    ctx.store
        .upsert(&project.complete(output.to_string_lossy()))
        .await?;
    Ok(output)
}
