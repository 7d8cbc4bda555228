//! Clip extraction and merging.
//!
//! Both steps drive the transcoder one job at a time. A job is awaited to
//! completion before the next one is started.

mod extract;
mod merge;

pub use extract::extract_clips;
pub use merge::merge_clips;

use std::fmt;

/// Progress of the transcoder job currently running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepProgress<'a> {
    /// Extraction of clip `index` (1-based) out of `total`.
    Clip {
        index: usize,
        total: usize,
        chunk_id: &'a str,
        percent: f64,
    },
    /// Concatenation of all clips.
    Merge { percent: f64 },
}

impl<'a> StepProgress<'a> {
    /// Chunk being extracted, if this is clip progress.
    pub fn chunk_id(&self) -> Option<&'a str> {
        match self {
            StepProgress::Clip { chunk_id, .. } => Some(*chunk_id),
            StepProgress::Merge { .. } => None,
        }
    }
}

impl fmt::Display for StepProgress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepProgress::Clip {
                index,
                total,
                percent,
                ..
            } => write!(f, "{}/{} : {:.2}% done", index, total, percent),
            StepProgress::Merge { percent } => write!(f, "Merging: {:.2}% done", percent),
        }
    }
}

/// Callback receiving step progress.
pub type ReportFn<'a> = &'a (dyn Fn(StepProgress<'_>) + Send + Sync);
