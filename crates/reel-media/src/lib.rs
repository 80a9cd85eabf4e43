//! FFmpeg/yt-dlp boundary.
//!
//! Everything that touches an external process lives in this crate:
//! remote acquisition, duration probing, transcript fetching, vertical clip
//! rendering, concatenation, script-slide rendering, and audio mixing.
//! The pipeline consumes all of it through the [`MediaEngine`] trait so runs
//! can be driven by a fake in tests.

pub mod acquire;
pub mod command;
pub mod concat;
pub mod engine;
pub mod error;
pub mod filters;
pub mod probe;
pub mod render;
pub mod script;
pub mod transcript;

pub use acquire::{acquire, is_supported_url};
pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use concat::concat_clips;
pub use engine::{EngineConfig, FfmpegEngine, MediaEngine};
pub use error::{MediaError, MediaResult};
pub use probe::{probe_media, MediaInfo};
pub use render::{render_clip, RenderConfig};
pub use script::{mix_audio, render_script, script_duration, ScriptConfig};
pub use transcript::fetch_transcript;
