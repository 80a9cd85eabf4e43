//! Highlight selection and project-run orchestration.
//!
//! This crate is the system's core: the pure highlight selector
//! ([`select`]), fallback segment derivation, the run state machine
//! ([`runner`]), the script-to-video synthesizer ([`script_job`]), and the
//! [`Reelsmith`] surface that callers submit to and poll. Media work and
//! persistence stay behind the [`reel_media::MediaEngine`] and
//! [`reel_store::ProjectStore`] traits.

pub mod config;
pub mod core;
pub mod error;
pub mod runner;
pub mod runs;
pub mod script_job;
pub mod segments;
pub mod select;
pub mod sentiment;

pub use crate::core::{Reelsmith, StatusSnapshot};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use runner::PipelineContext;
pub use runs::RunTracker;
pub use script_job::{script_lines, MAX_SCRIPT_LINES};
pub use segments::derive_segments;
pub use select::select;
pub use sentiment::polarity;
