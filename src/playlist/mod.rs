//! Playlist projection of a composition.
//!
//! Turns a composition's block list into resolved clip references that carry
//! their source media path and authored timestamps.

use crate::corpus::{Composition, Corpus};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// A resolved clip reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistEntry {
    /// Start offset in the source media, in seconds.
    pub start: f64,
    /// End offset in the source media, in seconds.
    pub end: f64,
    /// Active text rendering of the chunk.
    pub content: String,
    /// Chunk id.
    pub id: String,
    /// Local path of the source media.
    pub media: PathBuf,
}

impl PlaylistEntry {
    /// Duration of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Sum of all clip durations, i.e. the length of the assembled video.
pub fn total_duration(entries: &[PlaylistEntry]) -> f64 {
    entries.iter().map(PlaylistEntry::duration).sum()
}

/// Build the playlist for a composition.
///
/// Blocks that are not chunk blocks are ignored. Chunk blocks whose chunk or
/// media cannot be found in the corpus are dropped without error. Order is kept
/// as stored.
pub fn build_playlist(corpus: &Corpus, composition: &Composition) -> Vec<PlaylistEntry> {
    composition
        .summary
        .iter()
        .filter(|block| block.is_chunk())
        .filter_map(|block| {
            let Some(chunk_id) = block.chunk_id() else {
                debug!("Dropping chunk block without a chunk reference");
                return None;
            };

            let Some(chunk) = corpus.chunk(chunk_id) else {
                debug!(chunk_id, "Dropping block with unknown chunk");
                return None;
            };

            let Some(media) = corpus.media(&chunk.metadata.media_id) else {
                debug!(
                    chunk_id,
                    media_id = %chunk.metadata.media_id,
                    "Dropping block with unknown media"
                );
                return None;
            };

            let content = block
                .field_id()
                .and_then(|field| chunk.text(field))
                .unwrap_or_default()
                .to_string();

            Some(PlaylistEntry {
                start: chunk.start,
                end: chunk.end,
                content,
                id: chunk_id.to_string(),
                media: media.local_path(),
            })
        })
        .collect()
}
