//! Project record and its state machine.
//!
//! A `Project` is the durable unit of work: the submitted source, the run's
//! status and progress, and the final output path or error. Records are
//! created `idle` by submission and mutated only through the transition
//! methods below; terminal states are absorbing.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Generate a new random project ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Created, no run started yet
    #[default]
    Idle,
    /// A run is advancing through the pipeline stages
    Processing,
    /// Run finished; `output_path` is set
    Done,
    /// Run failed; `error` is set
    Error,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Idle => "idle",
            ProjectStatus::Processing => "processing",
            ProjectStatus::Done => "done",
            ProjectStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Done | ProjectStatus::Error)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual treatment for script slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStyle {
    /// White text on a near-black background
    #[default]
    Dark,
    /// Black text on an off-white background
    Light,
}

/// What the project was submitted with. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectSource {
    /// A video file already on local disk.
    File { path: String },
    /// A remote video resolved through the acquisition boundary; the same
    /// reference is used for transcript fetching.
    Remote { remote_ref: String },
    /// A literal script rendered as one slide per line.
    Script {
        script: String,
        /// Seconds each line stays on screen.
        #[serde(default = "default_per_line_secs")]
        per_line_secs: f64,
        #[serde(default)]
        style: ScriptStyle,
        /// Optional background audio mixed in after rendering.
        #[serde(skip_serializing_if = "Option::is_none")]
        audio_path: Option<String>,
    },
}

fn default_per_line_secs() -> f64 {
    2.0
}

impl ProjectSource {
    /// Remote reference, when the source has one.
    pub fn remote_ref(&self) -> Option<&str> {
        match self {
            ProjectSource::Remote { remote_ref } => Some(remote_ref),
            _ => None,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, ProjectSource::Script { .. })
    }
}

/// Derived metadata recorded during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectMeta {
    /// Source duration in seconds, when the probe could determine it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Number of highlights chosen by the selector.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_count: Option<usize>,
    /// Number of script lines rendered (synthesizer runs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
}

/// The durable record of one end-to-end job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    /// Unique project ID, assigned at submission
    pub id: ProjectId,

    /// Current lifecycle state
    #[serde(default)]
    pub status: ProjectStatus,

    /// Progress (0-100), monotonically non-decreasing within a run
    #[serde(default)]
    pub progress: u8,

    /// Submitted source
    pub source: ProjectSource,

    /// Final asset path; set exactly once, on the transition to `done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Failure message; set exactly once, on the transition to `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Derived metadata (source duration etc.)
    #[serde(default)]
    pub meta: ProjectMeta,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new idle project for a submitted source.
    pub fn new(source: ProjectSource) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            status: ProjectStatus::Idle,
            progress: 0,
            source,
            output_path: None,
            error: None,
            meta: ProjectMeta::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the run as started. No-op on a terminal record.
    pub fn start(mut self) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.status = ProjectStatus::Processing;
        self.updated_at = Utc::now();
        self
    }

    /// Raise progress to `progress`, clamped to 100. Progress never moves
    /// backwards; a terminal record is left untouched.
    pub fn with_progress(mut self, progress: u8) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.progress = self.progress.max(progress.min(100));
        self.updated_at = Utc::now();
        self
    }

    /// Finish the run: record the output asset and move to `done`.
    pub fn complete(mut self, output_path: impl Into<String>) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.status = ProjectStatus::Done;
        self.output_path = Some(output_path.into());
        self.progress = 100;
        self.updated_at = Utc::now();
        self
    }

    /// Fail the run with a human-readable message and move to `error`.
    pub fn fail(mut self, message: impl Into<String>) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        self.status = ProjectStatus::Error;
        self.error = Some(message.into());
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_project() -> Project {
        Project::new(ProjectSource::Remote {
            remote_ref: "https://youtube.com/watch?v=abc".to_string(),
        })
    }

    #[test]
    fn test_project_creation() {
        let project = remote_project();
        assert_eq!(project.status, ProjectStatus::Idle);
        assert_eq!(project.progress, 0);
        assert!(project.output_path.is_none());
        assert!(project.error.is_none());
    }

    #[test]
    fn test_project_state_transitions() {
        let project = remote_project();

        let started = project.start().with_progress(1);
        assert_eq!(started.status, ProjectStatus::Processing);
        assert_eq!(started.progress, 1);

        let done = started.complete("/data/final.mp4");
        assert_eq!(done.status, ProjectStatus::Done);
        assert_eq!(done.progress, 100);
        assert_eq!(done.output_path.as_deref(), Some("/data/final.mp4"));
    }

    #[test]
    fn test_progress_is_monotone() {
        let project = remote_project().start().with_progress(45);
        let stepped_back = project.with_progress(15);
        assert_eq!(stepped_back.progress, 45);

        let clamped = stepped_back.with_progress(250);
        assert_eq!(clamped.progress, 100);
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        let done = remote_project().start().complete("/data/final.mp4");
        let still_done = done.clone().fail("too late");
        assert_eq!(still_done.status, ProjectStatus::Done);
        assert!(still_done.error.is_none());
        assert_eq!(still_done.output_path, done.output_path);

        let failed = remote_project().start().fail("acquisition failed");
        let still_failed = failed.clone().complete("/data/final.mp4");
        assert_eq!(still_failed.status, ProjectStatus::Error);
        assert!(still_failed.output_path.is_none());
        assert_eq!(still_failed.error.as_deref(), Some("acquisition failed"));
    }

    #[test]
    fn test_source_serde_tagging() {
        let project = remote_project();
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["source"]["type"], "remote");
        assert_eq!(json["status"], "idle");

        let script = Project::new(ProjectSource::Script {
            script: "line one\nline two".to_string(),
            per_line_secs: 2.0,
            style: ScriptStyle::Dark,
            audio_path: None,
        });
        let json = serde_json::to_value(&script).unwrap();
        assert_eq!(json["source"]["type"], "script");
        assert_eq!(json["source"]["per_line_secs"], 2.0);
    }
}
