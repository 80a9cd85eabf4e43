//! Script-to-video synthesis.
//!
//! The second, independent pipeline: no acquisition, no transcript, no
//! selection. A validated script renders as one slide per line, optional
//! background audio is mixed in as a second pass, and the record moves
//! through progress 3, 10, 100 under the same polling contract as
//! highlight runs.

use std::path::PathBuf;

use tracing::info;

use reel_media::script_duration;
use reel_models::{Project, ProjectSource};

use crate::error::{PipelineError, PipelineResult};
use crate::runner::{checkpoint, PipelineContext};

/// Hard cap on rendered lines; anything past it is silently dropped.
pub const MAX_SCRIPT_LINES: usize = 40;

const PROGRESS_STARTED: u8 = 3;
const PROGRESS_PREPARED: u8 = 10;

/// Non-blank trimmed lines of a script, in order.
pub fn script_lines(script: &str) -> Vec<String> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) async fn run_script(
    ctx: &PipelineContext,
    project: Project,
) -> PipelineResult<PathBuf> {
    let (script, per_line_secs, style, audio_path) = match &project.source {
        ProjectSource::Script {
            script,
            per_line_secs,
            style,
            audio_path,
        } => (script.clone(), *per_line_secs, *style, audio_path.clone()),
        _ => return Err(PipelineError::input("Not a script project")),
    };

    let id = project.id.clone();
    info!(project_id = %id, "Starting script run");

    let mut project = project.start().with_progress(PROGRESS_STARTED);
    ctx.store.upsert(&project).await?;

    let lines: Vec<String> = script_lines(&script)
        .into_iter()
        .take(MAX_SCRIPT_LINES)
        .collect();
    if lines.is_empty() {
        return Err(PipelineError::input("Script has no non-blank lines"));
    }

    let work_dir = PathBuf::from(&ctx.config.work_dir).join(id.as_str());
    tokio::fs::create_dir_all(&work_dir).await?;

    project.meta.line_count = Some(lines.len());
    project.meta.duration_secs = Some(script_duration(lines.len(), per_line_secs));
    project = checkpoint(ctx, project, PROGRESS_PREPARED).await?;

    info!(project_id = %id, stage = "render", lines = lines.len(), "Rendering script slides");
    let script_path = work_dir.join("script.mp4");
    let rendered = ctx
        .engine
        .render_script(&lines, per_line_secs, style, &script_path)
        .await
        .map_err(|e| PipelineError::render(e.to_string()))?;

    let output = match audio_path {
        Some(audio) => {
            info!(project_id = %id, stage = "mix", audio = %audio, "Mixing background audio");
            let mixed_path = work_dir.join("script_mixed.mp4");
            ctx.engine
                .mix(&rendered, &PathBuf::from(audio), &mixed_path)
                .await
                .map_err(|e| PipelineError::render(e.to_string()))?
        }
        None => rendered,
    };

    ctx.store
        .upsert(&project.complete(output.to_string_lossy()))
        .await?;
    Ok(output)
}
