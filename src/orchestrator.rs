//! Pipeline orchestrator for Splice.
//!
//! Walks the corpus one composition at a time. Each composition goes through
//! playlist building, subtitle writing, clip extraction, merging and cleanup;
//! the next composition starts only after cleanup of the previous one.

use crate::assembly::{extract_clips, merge_clips, StepProgress};
use crate::config::Settings;
use crate::corpus::{Composition, Corpus};
use crate::error::SpliceError;
use crate::playlist::{build_playlist, total_duration, PlaylistEntry};
use crate::subtitle::{render, synthesize, SubtitleFormat};
use crate::transcoder::{FfmpegTranscoder, Transcoder};
use crate::workspace::{ensure_dir, CompositionLayout};
use indicatif::ProgressBar;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// States a composition passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PlaylistBuilt,
    SubtitlesWritten,
    ClipsExtracted,
    Merged,
    Cleaned,
}

/// Step of the pipeline that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    WriteSubtitles,
    ExtractClips,
    Merge,
    Cleanup,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::WriteSubtitles => "writing subtitles",
            Step::ExtractClips => "extracting clips",
            Step::Merge => "merging clips",
            Step::Cleanup => "cleaning up",
        };
        f.write_str(name)
    }
}

/// Result of a composition that was fully processed.
#[derive(Debug)]
pub struct CompositionReport {
    pub id: String,
    pub title: String,
    /// Number of clips in the assembled video.
    pub clips: usize,
    pub subtitle_path: PathBuf,
    /// Merged video, absent when the playlist was empty.
    pub video_path: Option<PathBuf>,
    /// States visited, in order.
    pub stages: Vec<Stage>,
}

/// A composition that could not be completed.
#[derive(Debug)]
pub struct CompositionFailure {
    pub id: String,
    pub title: String,
    pub step: Step,
    pub error: SpliceError,
    /// States visited, in order. Always ends with [`Stage::Cleaned`].
    pub stages: Vec<Stage>,
}

impl fmt::Display for CompositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' failed while {}: {}", self.title, self.step, self.error)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<Result<CompositionReport, CompositionFailure>>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_err()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompositionFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Whether every composition was processed successfully.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// The main orchestrator for the Splice pipeline.
pub struct Orchestrator {
    transcoder: Arc<dyn Transcoder>,
    output_root: PathBuf,
    clip_extension: String,
    subtitle_format: SubtitleFormat,
    progress: Option<ProgressBar>,
}

impl Orchestrator {
    /// Create an orchestrator that runs ffmpeg.
    pub fn new(settings: &Settings) -> Self {
        Self::with_transcoder(settings, Arc::new(FfmpegTranscoder::from_settings(settings)))
    }

    /// Create an orchestrator with a custom transcoder.
    pub fn with_transcoder(settings: &Settings, transcoder: Arc<dyn Transcoder>) -> Self {
        Self {
            transcoder,
            output_root: settings.output_dir(),
            clip_extension: settings.transcoder.clip_extension.clone(),
            subtitle_format: settings.subtitles.format,
            progress: None,
        }
    }

    /// Show transcoder progress on a progress bar or spinner.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Process every composition of the corpus, one after the other.
    #[instrument(skip_all, fields(compositions = corpus.compositions().len()))]
    pub async fn run(&self, corpus: &Corpus) -> RunSummary {
        let total = corpus.compositions().len();
        info!("{} compositions to process", total);

        let mut summary = RunSummary::default();
        for (i, composition) in corpus.compositions().iter().enumerate() {
            info!(
                "[{}/{}] Montage for composition: {}",
                i + 1,
                total,
                composition.title()
            );

            let outcome = self.process_composition(corpus, composition).await;
            match &outcome {
                Ok(report) => info!(
                    "'{}' done ({} clips)",
                    report.title, report.clips
                ),
                Err(failure) => error!("{}", failure),
            }
            summary.outcomes.push(outcome);
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        summary
    }

    /// Run the full pipeline for one composition.
    ///
    /// Cleanup of the transient directories always runs, whatever step failed.
    #[instrument(skip_all, fields(title = %composition.title()))]
    pub async fn process_composition(
        &self,
        corpus: &Corpus,
        composition: &Composition,
    ) -> Result<CompositionReport, CompositionFailure> {
        let layout = CompositionLayout::new(
            &self.output_root,
            composition.title(),
            &self.clip_extension,
        );

        let playlist = build_playlist(corpus, composition);
        debug!("Playlist has {} entries", playlist.len());

        let mut stages = vec![Stage::PlaylistBuilt];
        let assembled = self.assemble(&playlist, &layout, &mut stages).await;

        info!("Removing intermediate files");
        let cleaned = layout.cleanup().await;
        stages.push(Stage::Cleaned);

        let failure = |step: Step, error: SpliceError, stages: Vec<Stage>| CompositionFailure {
            id: composition.id.clone(),
            title: composition.title().to_string(),
            step,
            error,
            stages,
        };

        match (assembled, cleaned) {
            (Ok(video_path), Ok(())) => Ok(CompositionReport {
                id: composition.id.clone(),
                title: composition.title().to_string(),
                clips: playlist.len(),
                subtitle_path: layout.subtitle_path(self.subtitle_format),
                video_path,
                stages,
            }),
            (Ok(_), Err(e)) => Err(failure(Step::Cleanup, e, stages)),
            (Err((step, e)), cleaned) => {
                if let Err(cleanup_err) = cleaned {
                    warn!("Cleanup after failure also failed: {}", cleanup_err);
                }
                Err(failure(step, e, stages))
            }
        }
    }

    /// Subtitles, extraction and merge. Stops at the first failing step.
    async fn assemble(
        &self,
        playlist: &[PlaylistEntry],
        layout: &CompositionLayout,
        stages: &mut Vec<Stage>,
    ) -> Result<Option<PathBuf>, (Step, SpliceError)> {
        self.write_subtitles(playlist, layout)
            .await
            .map_err(|e| (Step::WriteSubtitles, e))?;
        stages.push(Stage::SubtitlesWritten);

        if playlist.is_empty() {
            warn!("No resolvable chunks, skipping video assembly");
            return Ok(None);
        }

        let report = |p: StepProgress<'_>| self.report(p);

        info!("Converting chunks: starting");
        let clips = extract_clips(self.transcoder.as_ref(), playlist, layout, &report)
            .await
            .map_err(|e| (Step::ExtractClips, e))?;
        stages.push(Stage::ClipsExtracted);

        let merged = merge_clips(
            self.transcoder.as_ref(),
            &clips,
            layout,
            total_duration(playlist),
            &report,
        )
        .await
        .map_err(|e| (Step::Merge, e))?;
        stages.push(Stage::Merged);
        info!("Merging successful: {}", merged.display());

        Ok(Some(merged))
    }

    async fn write_subtitles(
        &self,
        playlist: &[PlaylistEntry],
        layout: &CompositionLayout,
    ) -> crate::error::Result<()> {
        ensure_dir(layout.root()).await?;

        let path = layout.subtitle_path(self.subtitle_format);
        info!("Writing subtitles file {}", path.display());

        let body = render(&synthesize(playlist), self.subtitle_format);
        tokio::fs::write(&path, body).await?;
        Ok(())
    }

    fn report(&self, progress: StepProgress<'_>) {
        debug!(chunk_id = progress.chunk_id(), "{}", progress);
        if let Some(pb) = &self.progress {
            pb.set_message(progress.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::testing::RecordingTranscoder;
    use std::path::Path;

    fn settings(output: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.general.output_dir = output.display().to_string();
        settings
    }

    /// Two compositions; "Broken" references a media that fails to extract.
    fn corpus() -> Corpus {
        Corpus::from_json_str(
            r#"
            {
                "compositions": {
                    "k1": {
                        "metadata": {"title": "Broken"},
                        "summary": [
                            {"blockType": "chunk", "content": "good", "activeFieldId": "f"},
                            {"blockType": "chunk", "content": "bad", "activeFieldId": "f"},
                            {"blockType": "chunk", "content": "good2", "activeFieldId": "f"}
                        ]
                    },
                    "k2": {
                        "metadata": {"title": "Fine"},
                        "summary": [
                            {"blockType": "chunk", "content": "zebra", "activeFieldId": "f"},
                            {"blockType": "text", "content": "A heading"},
                            {"blockType": "chunk", "content": "missing", "activeFieldId": "f"},
                            {"blockType": "chunk", "content": "apple", "activeFieldId": "f"},
                            {"blockType": "chunk", "content": "mango", "activeFieldId": "f"}
                        ]
                    }
                },
                "chunks": {
                    "good":  {"start": 0.0, "end": 1.0, "metadata": {"mediaId": "ok"}, "fields": {"f": "g1"}},
                    "bad":   {"start": 0.0, "end": 1.0, "metadata": {"mediaId": "corrupt"}, "fields": {"f": "b"}},
                    "good2": {"start": 1.0, "end": 2.0, "metadata": {"mediaId": "ok"}, "fields": {"f": "g2"}},
                    "zebra": {"start": 5.0, "end": 7.0, "metadata": {"mediaId": "ok"}, "fields": {"f": "Zebra"}},
                    "apple": {"start": 1.0, "end": 2.5, "metadata": {"mediaId": "ok"}, "fields": {"f": "Apple"}},
                    "mango": {"start": 10.0, "end": 13.25, "metadata": {"mediaId": "ok"}, "fields": {"f": "Mango"}}
                },
                "medias": {
                    "ok": {"metadata": {"mediaUrl": "file:///media/ok.mp4"}},
                    "corrupt": {"metadata": {"mediaUrl": "file:///media/corrupt.mp4"}}
                }
            }
            "#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_failed_composition_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::new().failing_source("/media/corrupt.mp4"));
        let orchestrator = Orchestrator::with_transcoder(&settings(dir.path()), transcoder.clone());

        let summary = orchestrator.run(&corpus()).await;

        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.is_success());

        let broken = CompositionLayout::new(dir.path(), "Broken", "mp4");
        assert!(!broken.chunks_dir().exists());
        assert!(!broken.scratch_dir().exists());
        assert!(!broken.merged_path().exists());
        assert!(broken.subtitle_path(SubtitleFormat::Srt).exists());

        let failure = summary.failures().next().unwrap();
        assert_eq!(failure.title, "Broken");
        assert_eq!(failure.step, Step::ExtractClips);
        assert_eq!(
            failure.stages,
            vec![Stage::PlaylistBuilt, Stage::SubtitlesWritten, Stage::Cleaned]
        );

        let fine = CompositionLayout::new(dir.path(), "Fine", "mp4");
        assert!(fine.merged_path().exists());
        assert!(!fine.chunks_dir().exists());
        assert!(!fine.scratch_dir().exists());

        // Merge was never attempted for the broken composition.
        assert_eq!(transcoder.concats.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_successful_composition() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::new());
        let orchestrator = Orchestrator::with_transcoder(&settings(dir.path()), transcoder.clone());
        let corpus = corpus();

        let report = orchestrator
            .process_composition(&corpus, &corpus.compositions()[1])
            .await
            .unwrap();

        assert_eq!(report.id, "k2");
        assert_eq!(report.clips, 3);
        assert_eq!(
            report.stages,
            vec![
                Stage::PlaylistBuilt,
                Stage::SubtitlesWritten,
                Stage::ClipsExtracted,
                Stage::Merged,
                Stage::Cleaned
            ]
        );

        let layout = CompositionLayout::new(dir.path(), "Fine", "mp4");
        assert_eq!(report.video_path, Some(layout.merged_path()));

        // Concatenation order follows the composition, not the chunk ids.
        let concats = transcoder.concats.lock().unwrap();
        assert_eq!(
            concats[0].inputs,
            vec![
                layout.clip_path("zebra"),
                layout.clip_path("apple"),
                layout.clip_path("mango")
            ]
        );
        assert_eq!(concats[0].expected_duration, 2.0 + 1.5 + 3.25);

        // The unresolved chunk is absent from extraction and subtitles.
        assert!(!transcoder
            .extract_outputs()
            .contains(&layout.clip_path("missing")));
        let srt = std::fs::read_to_string(&report.subtitle_path).unwrap();
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,000\nZebra\n\n\
             2\n00:00:02,000 --> 00:00:03,500\nApple\n\n\
             3\n00:00:03,500 --> 00:00:06,750\nMango"
        );
    }

    #[tokio::test]
    async fn test_merge_failure_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::new().failing_concat());
        let orchestrator = Orchestrator::with_transcoder(&settings(dir.path()), transcoder);
        let corpus = corpus();

        let failure = orchestrator
            .process_composition(&corpus, &corpus.compositions()[1])
            .await
            .unwrap_err();

        assert_eq!(failure.step, Step::Merge);
        assert_eq!(
            failure.stages,
            vec![
                Stage::PlaylistBuilt,
                Stage::SubtitlesWritten,
                Stage::ClipsExtracted,
                Stage::Cleaned
            ]
        );

        let layout = CompositionLayout::new(dir.path(), "Fine", "mp4");
        assert!(!layout.chunks_dir().exists());
        assert!(!layout.scratch_dir().exists());
    }

    #[tokio::test]
    async fn test_empty_playlist_writes_empty_subtitles() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(RecordingTranscoder::new());
        let orchestrator = Orchestrator::with_transcoder(&settings(dir.path()), transcoder.clone());
        let corpus = Corpus::from_json_str(
            r#"{
                "compositions": {"e": {"metadata": {"title": "Empty"},
                    "summary": [{"blockType": "chunk", "content": "nowhere", "activeFieldId": "f"}]}},
                "chunks": {},
                "medias": {}
            }"#,
        )
        .unwrap();

        let summary = orchestrator.run(&corpus).await;
        assert!(summary.is_success());

        let layout = CompositionLayout::new(dir.path(), "Empty", "mp4");
        let srt = std::fs::read_to_string(layout.subtitle_path(SubtitleFormat::Srt)).unwrap();
        assert_eq!(srt, "");
        assert!(transcoder.extract_outputs().is_empty());
        assert!(transcoder.concats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webvtt_subtitles() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.subtitles.format = SubtitleFormat::WebVtt;
        let orchestrator =
            Orchestrator::with_transcoder(&settings, Arc::new(RecordingTranscoder::new()));
        let corpus = corpus();

        let report = orchestrator
            .process_composition(&corpus, &corpus.compositions()[1])
            .await
            .unwrap();

        assert_eq!(report.subtitle_path.extension().unwrap(), "vtt");
        let vtt = std::fs::read_to_string(&report.subtitle_path).unwrap();
        assert!(vtt.starts_with("WEBVTT\n\n1\n00:00:00.000 --> 00:00:02.000\nZebra"));
    }
}
