//! Typed view over an annotated media corpus.
//!
//! A corpus is a JSON document with three keyed collections: `compositions`,
//! `chunks` and `medias`. It is loaded once and never mutated.

mod models;

pub use models::{
    Block, Chunk, ChunkMetadata, Composition, CompositionMetadata, Media, MediaMetadata,
    CHUNK_BLOCK_TYPE,
};

use crate::error::{Result, SpliceError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// The loaded corpus.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Compositions in document order.
    compositions: Vec<Composition>,
    chunks: HashMap<String, Chunk>,
    medias: HashMap<String, Media>,
}

impl Corpus {
    /// Read and parse a corpus file.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SpliceError::CorpusLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a corpus from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content.trim())
            .map_err(|e| SpliceError::CorpusLoad(format!("invalid JSON: {}", e)))?;

        let mut root = match root {
            Value::Object(map) => map,
            _ => {
                return Err(SpliceError::CorpusLoad(
                    "top-level value must be an object".to_string(),
                ))
            }
        };

        let compositions = take_collection(&mut root, "compositions")?;
        let chunks = take_collection(&mut root, "chunks")?;
        let medias = take_collection(&mut root, "medias")?;

        let compositions = compositions
            .into_iter()
            .filter_map(|(id, value)| {
                let mut composition: Composition = parse_entity("composition", &id, value)?;
                composition.id = id;
                Some(composition)
            })
            .collect::<Vec<_>>();

        let chunks = chunks
            .into_iter()
            .filter_map(|(id, value)| Some((id.clone(), parse_entity("chunk", &id, value)?)))
            .collect::<HashMap<_, _>>();

        let medias = medias
            .into_iter()
            .filter_map(|(id, value)| Some((id.clone(), parse_entity("media", &id, value)?)))
            .collect::<HashMap<_, _>>();

        debug!(
            compositions = compositions.len(),
            chunks = chunks.len(),
            medias = medias.len(),
            "Corpus loaded"
        );

        Ok(Self {
            compositions,
            chunks,
            medias,
        })
    }

    /// Compositions in the order they appear in the corpus file.
    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    /// Look up a chunk by id.
    pub fn chunk(&self, id: &str) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    /// Look up a media by id.
    pub fn media(&self, id: &str) -> Option<&Media> {
        self.medias.get(id)
    }
}

fn take_collection(root: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>> {
    match root.remove(key) {
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(SpliceError::CorpusLoad(format!(
            "'{}' must be an object keyed by id",
            key
        ))),
        None => Err(SpliceError::CorpusLoad(format!(
            "missing top-level '{}' collection",
            key
        ))),
    }
}

/// Deserialize one collection entry. Malformed entries are logged and skipped;
/// references to them then resolve like any other missing id.
fn parse_entity<T: DeserializeOwned>(kind: &str, id: &str, value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(entity) => Some(entity),
        Err(e) if kind == "composition" => {
            warn!("Skipping malformed composition '{}': {}", id, e);
            None
        }
        Err(e) => {
            debug!(kind, id, error = %e, "Skipping malformed entry");
            None
        }
    }
}
