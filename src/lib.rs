//! Splice - montage assembly from an annotated media corpus
//!
//! A corpus holds source medias, timestamped transcript chunks cut from them,
//! and compositions that arrange chunks into a new sequence. Splice turns each
//! composition into a subtitle file and a video made of the referenced clips.
//!
//! # Architecture
//!
//! - `corpus` - Typed view over the corpus JSON
//! - `playlist` - Projection of a composition into resolved clip references
//! - `subtitle` - Cumulative subtitle timing and SRT/WebVTT rendering
//! - `transcoder` - External transcoder abstraction (ffmpeg)
//! - `assembly` - Sequential clip extraction and merging
//! - `workspace` - Output layout and directory handling
//! - `orchestrator` - Per-composition pipeline and run driver
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use splice::config::Settings;
//! use splice::corpus::Corpus;
//! use splice::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let corpus = Corpus::load(std::path::Path::new("corpus.json"))?;
//!
//!     let summary = Orchestrator::new(&settings).run(&corpus).await;
//!     println!("{} succeeded, {} failed", summary.succeeded(), summary.failed());
//!
//!     Ok(())
//! }
//! ```

pub mod assembly;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod orchestrator;
pub mod playlist;
pub mod subtitle;
pub mod transcoder;
pub mod workspace;

pub use error::{Result, SpliceError};
