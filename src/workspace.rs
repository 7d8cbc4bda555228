//! Output layout and file-system helpers.
//!
//! Every composition gets its own directory under the output root:
//!
//! ```text
//! <root>/<title>/<title>.srt        subtitle track
//! <root>/<title>/<title>.<ext>      merged video
//! <root>/<title>/chunks/<id>.<ext>  extracted clips, removed after merge
//! <root>/<title>/tmp/               transcoder scratch, removed after merge
//! ```

use crate::error::Result;
use crate::subtitle::SubtitleFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths used while assembling one composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionLayout {
    root: PathBuf,
    title: String,
    clip_extension: String,
}

impl CompositionLayout {
    /// Layout for `title` under `output_root`. The title always maps to a single
    /// directory directly below the root.
    pub fn new(output_root: &Path, title: &str, clip_extension: &str) -> Self {
        let title = path_segment(title);
        Self {
            root: output_root.join(&title),
            title,
            clip_extension: clip_extension.trim_start_matches('.').to_string(),
        }
    }

    /// The composition's directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding extracted clips.
    pub fn chunks_dir(&self) -> PathBuf {
        self.root.join("chunks")
    }

    /// Scratch directory for the merge step.
    pub fn scratch_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Path of the extracted clip for a chunk id.
    pub fn clip_path(&self, chunk_id: &str) -> PathBuf {
        self.chunks_dir()
            .join(format!("{}.{}", chunk_id, self.clip_extension))
    }

    /// Path of the subtitle file.
    pub fn subtitle_path(&self, format: SubtitleFormat) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.title, format.extension()))
    }

    /// Path of the merged video.
    pub fn merged_path(&self) -> PathBuf {
        self.root
            .join(format!("{}.{}", self.title, self.clip_extension))
    }

    /// Remove the transient `chunks/` and `tmp/` directories.
    ///
    /// Both removals are attempted even if the first one fails.
    pub async fn cleanup(&self) -> Result<()> {
        let chunks = remove_dir(&self.chunks_dir()).await;
        let scratch = remove_dir(&self.scratch_dir()).await;
        chunks.and(scratch)
    }
}

/// Turn a title into a single relative path component.
///
/// Path separators become `_`, and titles that would name the current or parent
/// directory are replaced.
fn path_segment(title: &str) -> String {
    let segment: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match segment.as_str() {
        "" | "." | ".." => "_".repeat(segment.len().max(1)),
        _ => segment,
    }
}

/// Create a directory and its parents; succeeds if it already exists.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// Recursively remove a directory; succeeds if it does not exist.
pub async fn remove_dir(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
