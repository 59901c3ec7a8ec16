//! Filter to remove titles the user already listed as liked.
//!
//! A seed can come back as a neighbor of another seed (two liked sequels are
//! usually each other's nearest neighbor), so this always runs before
//! truncation.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, SeedContext};

/// Removes candidates whose title is one of the request's seeds.
///
/// Uses the set in SeedContext for O(1) lookups.
pub struct SeedExclusionFilter;

impl Filter for SeedExclusionFilter {
    fn name(&self) -> &str {
        "SeedExclusionFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &SeedContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !context.contains(&candidate.title))
            .collect();
        Ok(filtered)
    }
}
