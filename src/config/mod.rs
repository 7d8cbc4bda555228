//! Configuration module for Splice.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{GeneralSettings, Settings, SubtitleSettings, TranscoderSettings};
