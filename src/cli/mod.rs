//! CLI module for Splice.

mod output;
pub mod preflight;

pub use output::Output;

use crate::config::Settings;
use crate::subtitle::SubtitleFormat;
use clap::Parser;
use std::path::PathBuf;

/// Splice - subtitle tracks and montage videos from an annotated corpus
///
/// Reads a corpus of compositions, chunks and medias, and for every composition
/// writes a subtitle file and a video assembled from the referenced clips.
#[derive(Parser, Debug)]
#[command(name = "splice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the corpus JSON file; relative paths resolve against the current directory
    pub corpus: PathBuf,

    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, env = "SPLICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root directory for generated output
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Subtitle format (srt, vtt)
    #[arg(short, long)]
    pub format: Option<SubtitleFormat>,

    /// Skip the ffmpeg availability check
    #[arg(long)]
    pub skip_preflight: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.output_dir {
            settings.general.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            settings.subtitles.format = format;
        }
    }

    /// Log filter level derived from `-v` flags, falling back to the configured level.
    pub fn log_level<'a>(&self, settings: &'a Settings) -> &'a str {
        match self.verbose {
            0 => settings.general.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
