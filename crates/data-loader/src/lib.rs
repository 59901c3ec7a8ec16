//! # Data Loader Crate
//!
//! This crate owns the pre-trained model artifacts the recommender serves
//! from: the ordered title index, the per-item feature vectors and the
//! metadata table.
//!
//! ## Main Components
//!
//! - **types**: Artifact types (TitleIndex, FeatureMatrix, MetadataTable, Artifacts)
//! - **parser**: Parse the artifact files into Rust structs
//! - **index**: Load, join and validate the bundle
//! - **error**: Error types for artifact loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Artifacts;
//! use std::path::Path;
//!
//! let artifacts = Artifacts::load_from_dir(Path::new("models"))?;
//!
//! let position = artifacts.titles.position("Toy Story").unwrap();
//! let vector = artifacts.features.row(position).unwrap();
//! let metadata = artifacts.metadata.get("Toy Story").unwrap();
//! ```
//!
//! Artifacts are immutable once loaded. Share them with `Arc<Artifacts>`.

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

pub use error::{DataLoadError, Result};
pub use index::{ArtifactPaths, FEATURES_FILE, METADATA_FILE, TITLES_FILE};
pub use types::{
    // Type aliases
    ItemPosition,
    MovieId,
    TmdbId,
    // Core types
    Artifacts,
    FeatureMatrix,
    MetadataTable,
    MovieMetadata,
    TitleIndex,
};
