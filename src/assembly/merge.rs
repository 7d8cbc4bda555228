//! Concatenation of extracted clips.

use super::{ReportFn, StepProgress};
use crate::error::Result;
use crate::transcoder::{ConcatJob, Transcoder};
use crate::workspace::{ensure_dir, CompositionLayout};
use std::path::PathBuf;
use tracing::info;

/// Join clips, in the given order, into the composition's merged video.
///
/// The layout's `tmp/` directory is handed to the transcoder as scratch space.
pub async fn merge_clips(
    transcoder: &dyn Transcoder,
    clips: &[PathBuf],
    layout: &CompositionLayout,
    expected_duration: f64,
    report: ReportFn<'_>,
) -> Result<PathBuf> {
    ensure_dir(&layout.scratch_dir()).await?;

    let job = ConcatJob {
        inputs: clips.to_vec(),
        output: layout.merged_path(),
        scratch_dir: layout.scratch_dir(),
        expected_duration,
    };

    info!("Merging {} chunks into {}", clips.len(), job.output.display());
    transcoder
        .concat(&job, &|percent: f64| report(StepProgress::Merge { percent }))
        .await?;

    Ok(job.output)
}
