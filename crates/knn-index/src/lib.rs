//! # k-Nearest-Neighbor Index
//!
//! The item-item similarity model: given a query feature vector, find the `k`
//! closest items by cosine distance.
//!
//! The recommender only depends on the [`NeighborIndex`] trait, so a
//! different index (approximate, remote, ...) can be swapped in. Note that the
//! recommender turns distances into similarities with `1 - distance` clamped
//! to `[0, 1]`, so cosine distances above 1 all read as similarity 0. A
//! replacement index with another metric has to revisit that formula.

use data_loader::{FeatureMatrix, ItemPosition};
use rayon::prelude::*;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Errors returned by a similarity index query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index contains no items")]
    EmptyIndex,

    #[error("Index unavailable: {0}")]
    Unavailable(String),
}

/// One search hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: ItemPosition,
    pub distance: f32,
}

/// Nearest-neighbor search over item feature vectors.
///
/// Implementations must be safe for concurrent read-only queries.
pub trait NeighborIndex: Send + Sync {
    /// Return up to `k` neighbors of `vector`, closest first.
    ///
    /// Ties are ordered by ascending position.
    fn nearest(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError>;

    /// Number of indexed items
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exhaustive cosine-distance search over the shared feature matrix
#[derive(Debug, Clone)]
pub struct BruteForceIndex {
    features: Arc<FeatureMatrix>,
    /// Precomputed L2 norm of every row
    norms: Vec<f32>,
}

impl BruteForceIndex {
    pub fn new(features: Arc<FeatureMatrix>) -> Self {
        let norms = features.rows().map(l2_norm).collect();
        Self { features, norms }
    }
}

impl NeighborIndex for BruteForceIndex {
    fn nearest(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if self.features.is_empty() {
            return Err(IndexError::EmptyIndex);
        }
        if vector.len() != self.features.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.features.dimension(),
                actual: vector.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_norm = l2_norm(vector);

        let mut neighbors: Vec<Neighbor> = self
            .norms
            .par_iter()
            .enumerate()
            .filter_map(|(position, &norm)| {
                let row = self.features.row(position)?;
                Some(Neighbor {
                    position,
                    distance: cosine_distance(vector, query_norm, row, norm),
                })
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.position.cmp(&b.position))
        });
        neighbors.truncate(k);

        trace!("Returning {} neighbors", neighbors.len());
        Ok(neighbors)
    }

    fn len(&self) -> usize {
        self.features.len()
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// `1 - cos(a, b)`, clamped to `[0, 2]`. A zero vector is orthogonal to
/// everything.
fn cosine_distance(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 1.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (1.0 - dot / (a_norm * b_norm)).clamp(0.0, 2.0)
}
