//! Core traits for the ranking pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to ranked candidates.

use anyhow::Result;
use sources::{Candidate, SeedContext};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// Filters receive candidates already sorted by similarity and must keep the
/// relative order of whatever they let through; truncation to the requested
/// count happens after the last filter.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - The request's seed titles
    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &SeedContext,
    ) -> Result<Vec<Candidate>>;
}
