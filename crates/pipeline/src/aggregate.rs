//! Multi-seed score aggregation.
//!
//! Every seed contributes its own neighbor list. A candidate reached from
//! several seeds keeps the best similarity any seed gave it (max-pooling):
//! one strong match beats many weak ones, and scores are never summed or
//! averaged over the number of seeds.

use rayon::prelude::*;
use sources::{Candidate, NeighborSource, SeedContext};
use std::collections::HashMap;
use tracing::debug;

/// Number of neighbors fetched per seed before merging
pub const DEFAULT_FAN_OUT: usize = 5;

/// Candidate title -> best similarity, in first-insertion order.
///
/// The insertion order is what breaks ties when ranking, so it must follow
/// the order seeds (and each seed's neighbors) were merged in.
#[derive(Debug, Clone, Default)]
pub struct CandidateScores {
    entries: Vec<Candidate>,
    positions: HashMap<String, usize>,
}

impl CandidateScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation, keeping the maximum score per title
    pub fn record(&mut self, candidate: Candidate) {
        match self.positions.get(&candidate.title) {
            Some(&idx) => {
                let existing = &mut self.entries[idx];
                if candidate.similarity > existing.similarity {
                    existing.similarity = candidate.similarity;
                }
            }
            None => {
                self.positions
                    .insert(candidate.title.clone(), self.entries.len());
                self.entries.push(candidate);
            }
        }
    }

    /// Current best score for `title`
    pub fn get(&self, title: &str) -> Option<f32> {
        self.positions
            .get(title)
            .map(|&idx| self.entries[idx].similarity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    pub fn into_candidates(self) -> Vec<Candidate> {
        self.entries
    }
}

impl FromIterator<Candidate> for CandidateScores {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        let mut scores = CandidateScores::new();
        for candidate in iter {
            scores.record(candidate);
        }
        scores
    }
}

/// Look up every seed and max-pool the results.
///
/// The lookups themselves run in parallel; merging walks the results in seed
/// order so the output is identical to a sequential run.
pub fn aggregate(source: &NeighborSource, context: &SeedContext, fan_out: usize) -> CandidateScores {
    let per_seed: Vec<Vec<Candidate>> = context
        .liked_titles
        .par_iter()
        .map(|title| source.lookup_similar(title, fan_out))
        .collect();

    let observed: usize = per_seed.iter().map(Vec::len).sum();
    let scores: CandidateScores = per_seed.into_iter().flatten().collect();

    debug!(
        "Aggregated {} observations from {} seeds into {} candidates",
        observed,
        context.len(),
        scores.len()
    );
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_pooling_keeps_best_score() {
        let scores: CandidateScores = vec![
            Candidate::new("Heat", 0.4),
            Candidate::new("Ronin", 0.7),
            Candidate::new("Heat", 0.9),
            Candidate::new("Heat", 0.5),
        ]
        .into_iter()
        .collect();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("Heat"), Some(0.9));
        assert_eq!(scores.get("Ronin"), Some(0.7));
    }

    #[test]
    fn test_never_sums_or_averages() {
        let mut scores = CandidateScores::new();
        scores.record(Candidate::new("Heat", 0.3));
        scores.record(Candidate::new("Heat", 0.3));
        scores.record(Candidate::new("Heat", 0.3));
        assert_eq!(scores.get("Heat"), Some(0.3));
    }

    #[test]
    fn test_insertion_order_survives_updates() {
        let mut scores = CandidateScores::new();
        scores.record(Candidate::new("Ronin", 0.5));
        scores.record(Candidate::new("Heat", 0.5));
        scores.record(Candidate::new("Ronin", 0.8));

        let titles: Vec<_> = scores.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Ronin", "Heat"]);
    }
}
