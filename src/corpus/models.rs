//! Data models for the annotated corpus.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Block type of the blocks that take part in assembly.
pub const CHUNK_BLOCK_TYPE: &str = "chunk";

/// A source media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub metadata: MediaMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    /// URL-like reference to the file, usually `file:///...`.
    pub media_url: String,
}

impl Media {
    /// Local path of the media with its `file://` scheme stripped.
    ///
    /// References without a `file` scheme are handed to the transcoder verbatim.
    pub fn local_path(&self) -> PathBuf {
        let raw = self.metadata.media_url.as_str();
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .unwrap_or_else(|_| PathBuf::from(raw.trim_start_matches("file://"))),
            _ => PathBuf::from(raw),
        }
    }
}

/// A timestamped transcript segment of a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Start offset in seconds.
    pub start: f64,
    /// End offset in seconds.
    pub end: f64,
    pub metadata: ChunkMetadata,
    /// Alternative text renderings keyed by field id.
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub media_id: String,
}

impl Chunk {
    /// Duration of this chunk in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Text rendering for a field id.
    pub fn text(&self, field_id: &str) -> Option<&str> {
        self.fields.get(field_id).map(String::as_str)
    }
}

/// One entry of a composition's block list.
///
/// Only chunk blocks have a known shape. Other block types may carry arbitrary
/// content, so `content` and `activeFieldId` are kept as raw JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub block_type: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub active_field_id: Value,
}

impl Block {
    /// Whether this block references a chunk.
    pub fn is_chunk(&self) -> bool {
        self.block_type == CHUNK_BLOCK_TYPE
    }

    /// Referenced chunk id, if this is a chunk block with a string reference.
    pub fn chunk_id(&self) -> Option<&str> {
        if self.is_chunk() {
            self.content.as_str()
        } else {
            None
        }
    }

    /// Field id selecting the chunk's text rendering.
    pub fn field_id(&self) -> Option<&str> {
        self.active_field_id.as_str()
    }
}

/// An ordered montage of chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Composition {
    /// Id under which the composition is stored in the corpus.
    #[serde(skip)]
    pub id: String,
    pub metadata: CompositionMetadata,
    #[serde(default)]
    pub summary: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionMetadata {
    pub title: String,
}

impl Composition {
    /// Human-readable title, also used as output path segment.
    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}
