//! Configuration settings for Splice.

use crate::subtitle::SubtitleFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcoder: TranscoderSettings,
    pub subtitles: SubtitleSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Root directory for per-composition output.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// External transcoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscoderSettings {
    /// Path or name of the ffmpeg binary.
    pub ffmpeg_path: String,
    /// Container extension for extracted clips and the merged video.
    pub clip_extension: String,
    /// Value passed to ffmpeg's -loglevel.
    pub log_level: String,
}

impl Default for TranscoderSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            clip_extension: "mp4".to_string(),
            log_level: "error".to_string(),
        }
    }
}

/// Subtitle output settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SubtitleSettings {
    /// Subtitle file format (srt, vtt).
    pub format: SubtitleFormat,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&content)
        } else if path.is_some() {
            Err(crate::error::SpliceError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )))
        } else {
            Ok(Settings::default())
        }
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> crate::error::Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        if settings.transcoder.clip_extension.trim().is_empty() {
            return Err(crate::error::SpliceError::Config(
                "transcoder.clip_extension must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("splice")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded ffmpeg binary path.
    pub fn ffmpeg_path(&self) -> PathBuf {
        Self::expand_path(&self.transcoder.ffmpeg_path)
    }
}
