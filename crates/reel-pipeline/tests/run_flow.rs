//! End-to-end run flow tests: a scripted fake media engine drives the
//! orchestrator and synthesizer against the in-memory store.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use reel_media::{MediaEngine, MediaError, MediaResult};
use reel_models::{ProjectId, ProjectSource, ProjectStatus, ScriptStyle, Segment};
use reel_pipeline::{PipelineConfig, PipelineError, Reelsmith, StatusSnapshot};
use reel_store::{MemoryProjectStore, ProjectStore};

/// Fake engine: every call is recorded, failures are scripted per stage,
/// and nothing touches a real subprocess.
#[derive(Default)]
struct FakeEngine {
    duration: f64,
    transcript: Vec<Segment>,
    fail_acquire: bool,
    fail_probe: bool,
    fail_render: bool,
    fail_mix: bool,
    /// Artificial latency per engine call, so tests can observe a run
    /// mid-flight.
    delay_ms: u64,
    calls: Mutex<Vec<String>>,
    rendered_windows: Mutex<Vec<(f64, f64)>>,
    script_lines_seen: Mutex<Vec<String>>,
}

impl FakeEngine {
    async fn pause(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    async fn record(&self, name: &str) {
        self.calls.lock().await.push(name.to_string());
    }

    async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    async fn acquire(&self, _remote_ref: &str, dest_dir: &Path) -> MediaResult<PathBuf> {
        self.pause().await;
        self.record("acquire").await;
        if self.fail_acquire {
            return Err(MediaError::download_failed("video unavailable"));
        }
        Ok(dest_dir.join("source.mp4"))
    }

    async fn probe_duration(&self, _path: &Path) -> MediaResult<f64> {
        self.pause().await;
        self.record("probe").await;
        if self.fail_probe {
            return Err(MediaError::FfprobeFailed {
                message: "unreadable container".to_string(),
                stderr: None,
            });
        }
        Ok(self.duration)
    }

    async fn fetch_transcript(&self, _remote_ref: &str, _workdir: &Path) -> Vec<Segment> {
        self.pause().await;
        self.record("transcript").await;
        self.transcript.clone()
    }

    async fn render_clip(
        &self,
        _src: &Path,
        start: f64,
        end: f64,
        dest: &Path,
    ) -> MediaResult<PathBuf> {
        self.pause().await;
        self.record("render").await;
        if self.fail_render {
            return Err(MediaError::ffmpeg_failed("encoder exploded", None, Some(1)));
        }
        self.rendered_windows.lock().await.push((start, end));
        Ok(dest.to_path_buf())
    }

    async fn concat(&self, _clips: &[PathBuf], dest: &Path) -> MediaResult<PathBuf> {
        self.pause().await;
        self.record("concat").await;
        Ok(dest.to_path_buf())
    }

    async fn render_script(
        &self,
        lines: &[String],
        _per_line_secs: f64,
        _style: ScriptStyle,
        dest: &Path,
    ) -> MediaResult<PathBuf> {
        self.pause().await;
        self.record("render_script").await;
        self.script_lines_seen.lock().await.extend(lines.iter().cloned());
        Ok(dest.to_path_buf())
    }

    async fn mix(&self, _video: &Path, _audio: &Path, dest: &Path) -> MediaResult<PathBuf> {
        self.pause().await;
        self.record("mix").await;
        if self.fail_mix {
            return Err(MediaError::ffmpeg_failed("amix failed", None, Some(1)));
        }
        Ok(dest.to_path_buf())
    }
}

struct Harness {
    core: Reelsmith,
    store: Arc<MemoryProjectStore>,
    engine: Arc<FakeEngine>,
    _work: tempfile::TempDir,
}

fn harness(engine: FakeEngine, highlight_count: usize) -> Harness {
    let work = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryProjectStore::new());
    let engine = Arc::new(engine);
    let config = PipelineConfig {
        work_dir: work.path().to_string_lossy().into_owned(),
        highlight_count,
        ffmpeg_timeout_secs: 60,
    };
    let core = Reelsmith::new(store.clone(), engine.clone(), config);
    Harness {
        core,
        store,
        engine,
        _work: work,
    }
}

/// A transcript with three well-separated speech segments.
fn spread_transcript() -> Vec<Segment> {
    vec![
        Segment::new(10.0, 16.0, "the secret trick nobody shows you"),
        Segment::new(50.0, 57.0, "an amazing result appears"),
        Segment::new(100.0, 108.0, "plain closing remarks here"),
    ]
}

fn remote_source() -> ProjectSource {
    ProjectSource::Remote {
        remote_ref: "https://youtube.com/watch?v=abc123".to_string(),
    }
}

async fn wait_terminal(core: &Reelsmith, id: &ProjectId) -> StatusSnapshot {
    for _ in 0..500 {
        let snap = core.poll_status(id).await.unwrap();
        if snap.status.is_terminal() {
            return snap;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("run never reached a terminal state");
}

#[tokio::test]
async fn test_remote_run_completes() {
    let h = harness(
        FakeEngine {
            duration: 120.0,
            transcript: spread_transcript(),
            ..Default::default()
        },
        3,
    );

    let id = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);
    assert_eq!(snap.progress, 100);
    assert!(snap.error.is_none());

    let asset = h.core.fetch_asset(&id).await.unwrap();
    assert!(asset.ends_with("final.mp4"));

    assert_eq!(
        h.engine.calls().await,
        vec!["acquire", "probe", "transcript", "render", "render", "render", "concat"]
    );
    let windows = h.engine.rendered_windows.lock().await.clone();
    assert_eq!(windows.len(), 3);
    // Clips render in start order.
    assert!((windows[0].0 - 10.0).abs() < 1e-9);
    assert!((windows[1].0 - 50.0).abs() < 1e-9);
    assert!((windows[2].0 - 100.0).abs() < 1e-9);

    let record = h.store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.meta.highlight_count, Some(3));
    assert_eq!(record.meta.duration_secs, Some(120.0));
}

#[tokio::test]
async fn test_acquire_failure_fails_the_run() {
    let h = harness(
        FakeEngine {
            fail_acquire: true,
            ..Default::default()
        },
        3,
    );

    let id = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Error);
    assert!(snap.error.unwrap().contains("Acquisition failed"));
    assert!(snap.progress < 100);

    // Nothing past the acquire stage ran.
    assert_eq!(h.engine.calls().await, vec!["acquire"]);
    assert!(matches!(
        h.core.fetch_asset(&id).await,
        Err(PipelineError::NotReady(_))
    ));
}

#[tokio::test]
async fn test_render_failure_aborts_the_run() {
    let h = harness(
        FakeEngine {
            duration: 120.0,
            transcript: spread_transcript(),
            fail_render: true,
            ..Default::default()
        },
        3,
    );

    let id = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Error);
    assert!(snap.error.unwrap().contains("Render failed"));

    // The first render failure stops the run before the remaining clips.
    assert_eq!(
        h.engine.calls().await,
        vec!["acquire", "probe", "transcript", "render"]
    );
}

#[tokio::test]
async fn test_file_source_skips_acquire_and_buckets_fallback() {
    let source_file = tempfile::NamedTempFile::new().unwrap();
    let h = harness(
        FakeEngine {
            duration: 60.0,
            ..Default::default()
        },
        3,
    );

    let id = h
        .core
        .submit(ProjectSource::File {
            path: source_file.path().to_string_lossy().into_owned(),
        })
        .await
        .unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);

    // No acquire, no transcript fetch; contiguous fallback buckets merge
    // into a single opening window.
    assert_eq!(h.engine.calls().await, vec!["probe", "render", "concat"]);
    let windows = h.engine.rendered_windows.lock().await.clone();
    assert_eq!(windows.len(), 1);
    assert!((windows[0].0 - 0.0).abs() < 1e-9);
    assert!((windows[0].1 - 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_probe_failure_degrades_but_run_completes() {
    let h = harness(
        FakeEngine {
            fail_probe: true,
            transcript: spread_transcript(),
            ..Default::default()
        },
        2,
    );

    let id = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);

    let record = h.store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.meta.duration_secs, None);
    assert_eq!(record.meta.highlight_count, Some(2));
}

#[tokio::test]
async fn test_unknown_duration_and_no_transcript_fails() {
    let h = harness(FakeEngine::default(), 3);

    let id = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Error);
    assert!(snap.error.unwrap().contains("unknown source duration"));
}

#[tokio::test]
async fn test_duplicate_start_is_rejected() {
    let h = harness(
        FakeEngine {
            duration: 120.0,
            transcript: spread_transcript(),
            delay_ms: 20,
            ..Default::default()
        },
        2,
    );

    let id = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&id).await.unwrap();
    assert!(matches!(
        h.core.start_run(&id).await,
        Err(PipelineError::AlreadyStarted(_))
    ));

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);

    // Terminal projects never start again.
    assert!(matches!(
        h.core.start_run(&id).await,
        Err(PipelineError::AlreadyStarted(_))
    ));
}

#[tokio::test]
async fn test_progress_is_monotone_and_processing_is_observable() {
    let h = harness(
        FakeEngine {
            duration: 120.0,
            transcript: spread_transcript(),
            delay_ms: 15,
            ..Default::default()
        },
        3,
    );

    let id = h.core.submit(remote_source()).await.unwrap();
    assert_eq!(
        h.core.poll_status(&id).await.unwrap().status,
        ProjectStatus::Idle
    );
    h.core.start_run(&id).await.unwrap();

    let mut snapshots = Vec::new();
    for _ in 0..2000 {
        let snap = h.core.poll_status(&id).await.unwrap();
        let terminal = snap.status.is_terminal();
        snapshots.push(snap);
        if terminal {
            break;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let last = snapshots.last().unwrap();
    assert_eq!(last.status, ProjectStatus::Done);
    assert_eq!(last.progress, 100);
    assert!(snapshots
        .iter()
        .any(|s| s.status == ProjectStatus::Processing));
    for pair in snapshots.windows(2) {
        assert!(pair[1].progress >= pair[0].progress);
    }
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let h = harness(FakeEngine::default(), 3);
    let ghost = ProjectId::new();

    assert!(matches!(
        h.core.poll_status(&ghost).await,
        Err(PipelineError::NotFound(_))
    ));
    assert!(matches!(
        h.core.start_run(&ghost).await,
        Err(PipelineError::NotFound(_))
    ));
    assert!(matches!(
        h.core.fetch_asset(&ghost).await,
        Err(PipelineError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_asset_is_not_ready_before_done() {
    let h = harness(FakeEngine::default(), 3);

    let id = h.core.submit(remote_source()).await.unwrap();
    assert!(matches!(
        h.core.fetch_asset(&id).await,
        Err(PipelineError::NotReady(_))
    ));
}

#[tokio::test]
async fn test_script_run_completes() {
    let h = harness(FakeEngine::default(), 3);

    let id = h
        .core
        .submit(ProjectSource::Script {
            script: "hello there\nsecond line\nthird line".to_string(),
            per_line_secs: 2.0,
            style: ScriptStyle::Dark,
            audio_path: None,
        })
        .await
        .unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);
    assert_eq!(snap.progress, 100);

    let asset = h.core.fetch_asset(&id).await.unwrap();
    assert!(asset.ends_with("script.mp4"));
    assert_eq!(h.engine.calls().await, vec!["render_script"]);

    let record = h.store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.meta.line_count, Some(3));
    assert_eq!(record.meta.duration_secs, Some(6.0));
}

#[tokio::test]
async fn test_script_with_audio_mixes_second_pass() {
    let h = harness(FakeEngine::default(), 3);

    let id = h
        .core
        .submit(ProjectSource::Script {
            script: "only line".to_string(),
            per_line_secs: 2.0,
            style: ScriptStyle::Light,
            audio_path: Some("/music/track.mp3".to_string()),
        })
        .await
        .unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);

    let asset = h.core.fetch_asset(&id).await.unwrap();
    assert!(asset.ends_with("script_mixed.mp4"));
    assert_eq!(h.engine.calls().await, vec!["render_script", "mix"]);
}

#[tokio::test]
async fn test_mix_failure_fails_the_run() {
    let h = harness(
        FakeEngine {
            fail_mix: true,
            ..Default::default()
        },
        3,
    );

    let id = h
        .core
        .submit(ProjectSource::Script {
            script: "only line".to_string(),
            per_line_secs: 2.0,
            style: ScriptStyle::Dark,
            audio_path: Some("/music/track.mp3".to_string()),
        })
        .await
        .unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Error);
    assert!(snap.error.unwrap().contains("Render failed"));
}

#[tokio::test]
async fn test_blank_script_is_rejected_at_submission() {
    let h = harness(FakeEngine::default(), 3);

    let result = h
        .core
        .submit(ProjectSource::Script {
            script: "   \n\t\n".to_string(),
            per_line_secs: 2.0,
            style: ScriptStyle::Dark,
            audio_path: None,
        })
        .await;

    assert!(matches!(result, Err(PipelineError::Input(_))));
    // Rejected synchronously: no record created, no renderer touched.
    assert_eq!(h.store.len().await, 0);
    assert!(h.engine.calls().await.is_empty());
}

#[tokio::test]
async fn test_invalid_per_line_secs_is_rejected() {
    let h = harness(FakeEngine::default(), 3);

    let result = h
        .core
        .submit(ProjectSource::Script {
            script: "a line".to_string(),
            per_line_secs: 0.0,
            style: ScriptStyle::Dark,
            audio_path: None,
        })
        .await;

    assert!(matches!(result, Err(PipelineError::Input(_))));
}

#[tokio::test]
async fn test_script_lines_capped_at_forty() {
    let h = harness(FakeEngine::default(), 3);

    let script = (0..45)
        .map(|i| format!("line number {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let id = h
        .core
        .submit(ProjectSource::Script {
            script,
            per_line_secs: 1.0,
            style: ScriptStyle::Dark,
            audio_path: None,
        })
        .await
        .unwrap();
    h.core.start_run(&id).await.unwrap();

    let snap = wait_terminal(&h.core, &id).await;
    assert_eq!(snap.status, ProjectStatus::Done);

    assert_eq!(h.engine.script_lines_seen.lock().await.len(), 40);
    let record = h.store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.meta.line_count, Some(40));
    assert_eq!(record.meta.duration_secs, Some(40.0));
}

#[tokio::test]
async fn test_runs_for_different_projects_proceed_concurrently() {
    let h = harness(
        FakeEngine {
            duration: 120.0,
            transcript: spread_transcript(),
            delay_ms: 10,
            ..Default::default()
        },
        2,
    );

    let first = h.core.submit(remote_source()).await.unwrap();
    let second = h.core.submit(remote_source()).await.unwrap();
    h.core.start_run(&first).await.unwrap();
    h.core.start_run(&second).await.unwrap();

    let first_snap = wait_terminal(&h.core, &first).await;
    let second_snap = wait_terminal(&h.core, &second).await;
    assert_eq!(first_snap.status, ProjectStatus::Done);
    assert_eq!(second_snap.status, ProjectStatus::Done);
}
