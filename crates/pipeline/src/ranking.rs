//! Ranking: sort the aggregated scores, filter, and cut to the requested size.

use crate::aggregate::CandidateScores;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::SeedExclusionFilter;
use anyhow::Result;
use sources::{Candidate, SeedContext};

/// Sorts candidates by similarity and applies the filter pipeline
pub struct Ranker {
    filters: FilterPipeline,
}

impl Ranker {
    /// Ranker with the default filters (seed exclusion)
    pub fn new() -> Self {
        Self::with_filters(FilterPipeline::new().add_filter(SeedExclusionFilter))
    }

    pub fn with_filters(filters: FilterPipeline) -> Self {
        Self { filters }
    }

    /// Rank `scores` for one request.
    ///
    /// 1. Stable sort by similarity, highest first; equal scores keep their
    ///    first-insertion order
    /// 2. Run the filters (seeds are dropped here)
    /// 3. Keep the first `n`; fewer is fine, nothing is padded
    pub fn rank(
        &self,
        scores: CandidateScores,
        context: &SeedContext,
        n: usize,
    ) -> Result<Vec<Candidate>> {
        let mut candidates = scores.into_candidates();
        // `sort_by` is stable, which is what makes the tie-break deterministic
        candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        let mut ranked = self.filters.apply(candidates, context)?;
        ranked.truncate(n);
        Ok(ranked)
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}
