//! ffmpeg-backed transcoder.
//!
//! Runs one ffmpeg process per job and follows its `-progress pipe:1` output.

use super::{ConcatJob, ExtractJob, ProgressFn, Transcoder};
use crate::config::Settings;
use crate::error::{Result, SpliceError};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Name of the segment list written to the scratch directory.
const CONCAT_LIST_FILE: &str = "concat.txt";

/// Transcoder that shells out to ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
    log_level: String,
}

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self::with_binary("ffmpeg", "error")
    }

    /// Create a transcoder using a specific ffmpeg binary and log level.
    pub fn with_binary(binary: impl Into<PathBuf>, log_level: &str) -> Self {
        Self {
            binary: binary.into(),
            log_level: log_level.to_string(),
        }
    }

    /// Create a transcoder from application settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_binary(settings.ffmpeg_path(), &settings.transcoder.log_level)
    }

    fn common_args(&self) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-hide_banner".into(),
            "-nostats".into(),
            "-loglevel".into(),
            self.log_level.clone().into(),
            "-progress".into(),
            "pipe:1".into(),
        ]
    }

    fn extract_args(&self, job: &ExtractJob) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("-ss".into());
        args.push(format!("{:.3}", job.start).into());
        args.push("-i".into());
        args.push(job.source.clone().into());
        args.push("-t".into());
        args.push(format!("{:.3}", job.duration).into());
        args.push(job.output.clone().into());
        args
    }

    fn concat_args(&self, list_path: &Path, output: &Path) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("-f".into());
        args.push("concat".into());
        args.push("-safe".into());
        args.push("0".into());
        args.push("-i".into());
        args.push(list_path.into());
        args.push("-c".into());
        args.push("copy".into());
        args.push(output.into());
        args
    }

    /// Run ffmpeg to completion, reporting progress against `expected_duration`.
    async fn run(
        &self,
        args: Vec<OsString>,
        expected_duration: f64,
        progress: ProgressFn<'_>,
    ) -> Result<()> {
        let spawned = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SpliceError::ToolNotFound(self.binary.display().to_string()));
            }
            Err(e) => {
                return Err(SpliceError::Transcode(format!("failed to start ffmpeg: {e}")));
            }
        };

        debug!(pid = child.id(), "ffmpeg process started");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SpliceError::Transcode("failed to capture ffmpeg stdout".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SpliceError::Transcode("failed to capture ffmpeg stderr".into()))?;

        // ffmpeg blocks once the stderr pipe fills up, so drain it alongside stdout.
        let stderr_task = tokio::spawn(async move {
            let mut output = String::new();
            match stderr.read_to_string(&mut output).await {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut lines = BufReader::new(stdout).lines();
        let mut state = ProgressState::default();

        while let Some(line) = lines.next_line().await? {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            state.update(key, value);
            if key == "progress" {
                progress(state.percent(expected_duration));
            }
        }

        let status = child.wait().await?;
        let stderr_output = stderr_task
            .await
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(SpliceError::Transcode(format!(
                "ffmpeg exited with {}: {}",
                status,
                stderr_output.trim()
            )));
        }

        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[instrument(skip(self, progress), fields(source = %job.source.display(), output = %job.output.display()))]
    async fn extract(&self, job: &ExtractJob, progress: ProgressFn<'_>) -> Result<()> {
        self.run(self.extract_args(job), job.duration, progress).await
    }

    #[instrument(skip(self, progress), fields(inputs = job.inputs.len(), output = %job.output.display()))]
    async fn concat(&self, job: &ConcatJob, progress: ProgressFn<'_>) -> Result<()> {
        if job.inputs.is_empty() {
            return Err(SpliceError::InvalidInput("nothing to concatenate".into()));
        }

        // The concat demuxer resolves relative entries against the list file.
        let inputs = job
            .inputs
            .iter()
            .map(std::fs::canonicalize)
            .collect::<std::io::Result<Vec<_>>>()?;

        tokio::fs::create_dir_all(&job.scratch_dir).await?;
        let list_path = job.scratch_dir.join(CONCAT_LIST_FILE);
        tokio::fs::write(&list_path, concat_list(&inputs)).await?;

        self.run(
            self.concat_args(&list_path, &job.output),
            job.expected_duration,
            progress,
        )
        .await
    }
}

/// Render a segment list for ffmpeg's concat demuxer.
fn concat_list(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| format!("file '{}'\n", p.display().to_string().replace('\'', "'\\''")))
        .collect()
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // Both keys carry microseconds.
            "out_time_us" | "out_time_ms" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }

    fn percent(&self, expected_duration: f64) -> f64 {
        if self.complete {
            100.0
        } else if expected_duration <= 0.0 {
            0.0
        } else {
            (self.out_time_secs / expected_duration * 100.0).clamp(0.0, 100.0)
        }
    }
}
