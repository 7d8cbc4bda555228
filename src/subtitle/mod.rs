//! Subtitle synthesis for assembled compositions.
//!
//! Subtitle times follow the concatenated video rather than the source media:
//! each entry starts where the previous one ended, and the first starts at zero.

mod format;

pub use format::{format_timestamp, SubtitleFormat};

use crate::playlist::PlaylistEntry;
use serde::Serialize;

/// A single cue of the subtitle track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleEntry {
    /// Start offset in milliseconds.
    pub start: u64,
    /// End offset in milliseconds.
    pub end: u64,
    pub text: String,
}

/// Convert seconds to whole milliseconds, truncating toward zero.
fn to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0).trunc() as u64
}

/// Lay the playlist out end to end and produce one cue per entry.
pub fn synthesize(playlist: &[PlaylistEntry]) -> Vec<SubtitleEntry> {
    let mut displacement = 0.0;
    let mut entries = Vec::with_capacity(playlist.len());

    for entry in playlist {
        let duration = entry.duration();
        entries.push(SubtitleEntry {
            start: to_millis(displacement),
            end: to_millis(displacement + duration),
            text: entry.content.clone(),
        });
        displacement += duration;
    }

    entries
}

/// Serialize cues to subtitle file text.
pub fn render(entries: &[SubtitleEntry], format: SubtitleFormat) -> String {
    let body = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}\n{} --> {}\n{}",
                i + 1,
                format_timestamp(entry.start, format),
                format_timestamp(entry.end, format),
                entry.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let body = body.trim();

    match format {
        SubtitleFormat::Srt => body.to_string(),
        SubtitleFormat::WebVtt if body.is_empty() => "WEBVTT".to_string(),
        SubtitleFormat::WebVtt => format!("WEBVTT\n\n{}", body),
    }
}
