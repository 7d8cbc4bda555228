//! External transcoder abstraction.
//!
//! The pipeline never decodes or encodes media itself. It describes cut and
//! concatenation jobs and hands them to a [`Transcoder`].

mod ffmpeg;

pub use ffmpeg::FfmpegTranscoder;

use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Receives completion percentages (0.0 to 100.0) while a job runs.
pub type ProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// Cut `[start, start + duration]` out of a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractJob {
    pub source: PathBuf,
    /// Start offset in seconds.
    pub start: f64,
    /// Length of the cut in seconds.
    pub duration: f64,
    pub output: PathBuf,
}

/// Join several files end to end into one output file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatJob {
    /// Inputs in playback order.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    /// Directory for intermediate files such as segment lists.
    pub scratch_dir: PathBuf,
    /// Expected length of the output in seconds, used for progress.
    pub expected_duration: f64,
}

/// Trait for transcoding backends.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Extract a single sub-clip. Resolves once the output file is complete.
    async fn extract(&self, job: &ExtractJob, progress: ProgressFn<'_>) -> Result<()>;

    /// Concatenate clips. Resolves once the output file is complete.
    async fn concat(&self, job: &ConcatJob, progress: ProgressFn<'_>) -> Result<()>;
}
