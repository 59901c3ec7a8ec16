//! Per-seed lookup against the item-item similarity index.
//!
//! ## Algorithm
//! 1. Resolve the seed title to its position (first occurrence wins)
//! 2. Fetch the feature vector at that position
//! 3. Ask the index for `k + 1` neighbors, since the seed is normally its own
//!    nearest neighbor
//! 4. Drop the seed itself by position, keep at most `k`
//! 5. Turn each distance into `1 - distance`, clamped to `[0, 1]` and rounded
//!    to 4 decimals

use crate::types::Candidate;
use data_loader::{Artifacts, ItemPosition};
use knn_index::{IndexError, NeighborIndex};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Unexpected failures while looking up one seed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("No feature vector for position {position}")]
    MissingVector { position: ItemPosition },

    #[error("Index returned unknown position {position}")]
    UnknownPosition { position: ItemPosition },

    #[error("Similarity index query failed: {0}")]
    Index(#[from] IndexError),
}

/// Outcome of looking up one seed.
///
/// Unknown titles are an expected outcome (typos, cold start) and are kept
/// apart from real failures so callers can log them differently.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedLookup {
    Found(Vec<Candidate>),
    UnknownSeed,
    Failed(LookupError),
}

impl SeedLookup {
    /// Collapse into the candidate list; anything but `Found` contributes nothing
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            SeedLookup::Found(candidates) => candidates,
            SeedLookup::UnknownSeed | SeedLookup::Failed(_) => Vec::new(),
        }
    }
}

/// Finds the items most similar to a single seed title
#[derive(Clone)]
pub struct NeighborSource {
    /// Shared read-only artifacts
    artifacts: Arc<Artifacts>,
    /// Long-lived index handle, built once at startup
    index: Arc<dyn NeighborIndex>,
}

impl NeighborSource {
    pub fn new(artifacts: Arc<Artifacts>, index: Arc<dyn NeighborIndex>) -> Self {
        Self { artifacts, index }
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    /// Look up the `k` items most similar to `title`
    #[instrument(skip(self), level = "debug")]
    pub fn lookup(&self, title: &str, k: usize) -> SeedLookup {
        let Some(position) = self.artifacts.titles.position(title) else {
            return SeedLookup::UnknownSeed;
        };

        match self.neighbors_of(position, k) {
            Ok(candidates) => SeedLookup::Found(candidates),
            Err(e) => SeedLookup::Failed(e),
        }
    }

    /// Same as [`lookup`](Self::lookup), degraded to a plain list.
    ///
    /// A seed that cannot be resolved never aborts the request; it just
    /// contributes no candidates.
    pub fn lookup_similar(&self, title: &str, k: usize) -> Vec<Candidate> {
        match self.lookup(title, k) {
            SeedLookup::Found(candidates) => {
                debug!("Seed '{}' produced {} candidates", title, candidates.len());
                candidates
            }
            SeedLookup::UnknownSeed => {
                debug!("Seed '{}' not in title index, skipping", title);
                Vec::new()
            }
            SeedLookup::Failed(e) => {
                warn!("Lookup failed for seed '{}': {}", title, e);
                Vec::new()
            }
        }
    }

    fn neighbors_of(&self, position: ItemPosition, k: usize) -> Result<Vec<Candidate>, LookupError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let vector = self
            .artifacts
            .features
            .row(position)
            .ok_or(LookupError::MissingVector { position })?;

        let neighbors = self.index.nearest(vector, k + 1)?;

        let mut candidates = Vec::with_capacity(k);
        for neighbor in neighbors {
            if neighbor.position == position {
                continue;
            }
            let title = self
                .artifacts
                .titles
                .title(neighbor.position)
                .ok_or(LookupError::UnknownPosition {
                    position: neighbor.position,
                })?;
            candidates.push(Candidate::new(title, distance_to_similarity(neighbor.distance)));
        }
        candidates.truncate(k);

        Ok(candidates)
    }
}

/// `1 - distance`, clamped to `[0, 1]` and rounded to 4 decimal places.
///
/// Cosine distance runs up to 2 for opposed vectors; those items are reported
/// as 0 rather than a negative similarity.
pub fn distance_to_similarity(distance: f32) -> f32 {
    let similarity = (1.0 - distance as f64).clamp(0.0, 1.0);
    (similarity * 10_000.0).round() as f32 / 10_000.0
}
