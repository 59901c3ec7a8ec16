//! # Sources Crate
//!
//! Candidate generation for the item-item recommender: for each liked
//! ("seed") title, find the most similar titles in the pre-trained
//! nearest-neighbor model.
//!
//! ## Components
//!
//! - **types**: `Candidate` (title + similarity) and `SeedContext` (the
//!   liked titles of one request)
//! - **neighbors**: `NeighborSource`, the per-seed lookup
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{NeighborSource, SeedContext};
//! use knn_index::BruteForceIndex;
//! use std::sync::Arc;
//!
//! let artifacts = Arc::new(Artifacts::load_from_dir(Path::new("models"))?);
//! let index = Arc::new(BruteForceIndex::new(artifacts.features.clone()));
//! let source = NeighborSource::new(artifacts, index);
//!
//! let candidates = source.lookup_similar("Toy Story", 5);
//! ```

pub mod types;
pub mod neighbors;

pub use types::{Candidate, SeedContext};
pub use neighbors::{distance_to_similarity, LookupError, NeighborSource, SeedLookup};
