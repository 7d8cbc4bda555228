//! Sequential sub-clip extraction.

use super::{ReportFn, StepProgress};
use crate::error::Result;
use crate::playlist::PlaylistEntry;
use crate::transcoder::{ExtractJob, Transcoder};
use crate::workspace::{ensure_dir, CompositionLayout};
use std::path::PathBuf;
use tracing::{info, warn};

/// Cut one clip per playlist entry into the layout's `chunks/` directory.
///
/// Entries are extracted strictly in order and one at a time. The first failure
/// stops the loop and is returned; clips already written are left in place for
/// the caller's cleanup. Returns clip paths in playlist order.
pub async fn extract_clips(
    transcoder: &dyn Transcoder,
    playlist: &[PlaylistEntry],
    layout: &CompositionLayout,
    report: ReportFn<'_>,
) -> Result<Vec<PathBuf>> {
    ensure_dir(&layout.chunks_dir()).await?;

    let total = playlist.len();
    let mut clips = Vec::with_capacity(total);

    for (i, entry) in playlist.iter().enumerate() {
        let index = i + 1;
        info!("Converting chunk {}/{} ({})", index, total, entry.id);

        let job = ExtractJob {
            source: entry.media.clone(),
            start: entry.start,
            duration: entry.duration(),
            output: layout.clip_path(&entry.id),
        };

        let on_progress = |percent: f64| {
            report(StepProgress::Clip {
                index,
                total,
                chunk_id: &entry.id,
                percent,
            })
        };

        if let Err(e) = transcoder.extract(&job, &on_progress).await {
            warn!("Chunk {}/{} ({}) failed: {}", index, total, entry.id, e);
            return Err(e);
        }

        clips.push(job.output);
    }

    info!("Converted {} chunks", clips.len());
    Ok(clips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::testing::RecordingTranscoder;
    use std::path::Path;
    use std::sync::Mutex;

    fn entry(id: &str, media: &str, start: f64, end: f64) -> PlaylistEntry {
        PlaylistEntry {
            start,
            end,
            content: format!("text of {}", id),
            id: id.to_string(),
            media: PathBuf::from(media),
        }
    }

    #[tokio::test]
    async fn test_extracts_in_playlist_order() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CompositionLayout::new(dir.path(), "Demo", "mp4");
        let transcoder = RecordingTranscoder::new();
        let playlist = vec![
            entry("zz", "/m/a.mp4", 1.0, 3.0),
            entry("aa", "/m/a.mp4", 0.5, 1.0),
            entry("mm", "/m/b.mp4", 7.0, 9.5),
        ];

        let clips = extract_clips(&transcoder, &playlist, &layout, &|_: StepProgress<'_>| {})
            .await
            .unwrap();

        assert_eq!(
            clips,
            vec![
                layout.clip_path("zz"),
                layout.clip_path("aa"),
                layout.clip_path("mm")
            ]
        );
        assert_eq!(transcoder.extract_outputs(), clips);
        assert!(clips.iter().all(|c| c.exists()));

        let jobs = transcoder.extracts.lock().unwrap();
        assert_eq!(jobs[2].start, 7.0);
        assert_eq!(jobs[2].duration, 2.5);
        assert_eq!(jobs[2].source, Path::new("/m/b.mp4"));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CompositionLayout::new(dir.path(), "Demo", "mp4");
        let transcoder = RecordingTranscoder::new().failing_source("/m/broken.mp4");
        let playlist = vec![
            entry("c1", "/m/a.mp4", 0.0, 1.0),
            entry("c2", "/m/broken.mp4", 0.0, 1.0),
            entry("c3", "/m/a.mp4", 1.0, 2.0),
        ];

        let result = extract_clips(&transcoder, &playlist, &layout, &|_: StepProgress<'_>| {}).await;

        assert!(result.is_err());
        assert_eq!(
            transcoder.extract_outputs(),
            vec![layout.clip_path("c1"), layout.clip_path("c2")]
        );
        assert!(layout.clip_path("c1").exists());
        assert!(!layout.clip_path("c3").exists());
    }

    #[tokio::test]
    async fn test_reports_clip_progress() {
        let dir = tempfile::tempdir().unwrap();
        let layout = CompositionLayout::new(dir.path(), "Demo", "mp4");
        let transcoder = RecordingTranscoder::new();
        let playlist = vec![entry("c1", "/m/a.mp4", 0.0, 1.0), entry("c2", "/m/a.mp4", 1.0, 2.0)];
        let seen = Mutex::new(Vec::new());

        let record = |p: StepProgress<'_>| {
            let line = format!("{} {}", p.chunk_id().unwrap_or("-"), p);
            seen.lock().unwrap().push(line);
        };
        extract_clips(&transcoder, &playlist, &layout, &record)
            .await
            .unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.first().unwrap(), "c1 1/2 : 50.00% done");
        assert_eq!(seen.last().unwrap(), "c2 2/2 : 100.00% done");
    }
}
