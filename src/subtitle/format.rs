//! Subtitle file formats and timestamp rendering.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Supported subtitle file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// SubRip (`HH:MM:SS,mmm`).
    #[default]
    Srt,
    /// WebVTT (`HH:MM:SS.mmm`).
    #[serde(rename = "vtt", alias = "webvtt")]
    WebVtt,
}

impl SubtitleFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::WebVtt => "vtt",
        }
    }

    fn millis_separator(&self) -> char {
        match self {
            SubtitleFormat::Srt => ',',
            SubtitleFormat::WebVtt => '.',
        }
    }
}

impl std::str::FromStr for SubtitleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" | "webvtt" => Ok(SubtitleFormat::WebVtt),
            _ => Err(format!("Unknown subtitle format: {}. Use srt or vtt.", s)),
        }
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render a millisecond offset as a subtitle timestamp.
///
/// Minutes and seconds wrap at 60; hours keep counting past a day.
pub fn format_timestamp(millis: u64, format: SubtitleFormat) -> String {
    let elapsed = Duration::milliseconds(i64::try_from(millis).unwrap_or(i64::MAX));

    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() % 60;
    let seconds = elapsed.num_seconds() % 60;
    let ms = elapsed.num_milliseconds() % 1000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        seconds,
        format.millis_separator(),
        ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srt_timestamp_boundaries() {
        assert_eq!(format_timestamp(0, SubtitleFormat::Srt), "00:00:00,000");
        assert_eq!(format_timestamp(999, SubtitleFormat::Srt), "00:00:00,999");
        assert_eq!(format_timestamp(60_000, SubtitleFormat::Srt), "00:01:00,000");
        assert_eq!(format_timestamp(3_723_456, SubtitleFormat::Srt), "01:02:03,456");
    }

    #[test]
    fn test_carry_into_hours() {
        assert_eq!(format_timestamp(3_600_000, SubtitleFormat::Srt), "01:00:00,000");
        assert_eq!(format_timestamp(3_599_999, SubtitleFormat::Srt), "00:59:59,999");
    }

    #[test]
    fn test_hours_not_capped() {
        assert_eq!(format_timestamp(90_000_000, SubtitleFormat::Srt), "25:00:00,000");
    }

    #[test]
    fn test_webvtt_separator() {
        assert_eq!(format_timestamp(3_723_456, SubtitleFormat::WebVtt), "01:02:03.456");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("srt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Srt);
        assert_eq!("SRT".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Srt);
        assert_eq!("vtt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::WebVtt);
        assert_eq!("webvtt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::WebVtt);
        assert!("ass".parse::<SubtitleFormat>().is_err());
    }
}
