//! Pre-flight checks before expensive operations.
//!
//! Validates that the transcoder is available before any composition is
//! touched, so a missing binary does not surface once per clip.

use crate::error::{Result, SpliceError};
use std::path::Path;
use std::process::Command;

/// Install hint shown when ffmpeg is missing.
pub const FFMPEG_INSTALL_HINT: &str =
    "Install ffmpeg (e.g. 'apt install ffmpeg' or 'brew install ffmpeg') or set transcoder.ffmpeg_path";

/// Check that the ffmpeg binary at `binary` runs.
pub fn check_ffmpeg(binary: &Path) -> Result<()> {
    check_tool(binary, "-version")
}

/// Check if an external tool is available.
fn check_tool(binary: &Path, version_arg: &str) -> Result<()> {
    let name = binary.display();
    match Command::new(binary).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SpliceError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SpliceError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SpliceError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
