//! Shared data models for the Reelsmith pipeline.
//!
//! Everything that crosses a crate boundary lives here: transcript segments,
//! selected highlights, and the durable project record with its state
//! machine.

pub mod highlight;
pub mod project;
pub mod segment;

pub use highlight::Highlight;
pub use project::{Project, ProjectId, ProjectMeta, ProjectSource, ProjectStatus, ScriptStyle};
pub use segment::Segment;
