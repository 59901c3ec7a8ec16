//! # Recommendation Orchestrator
//!
//! This module coordinates the recommendation pipeline for one request:
//! 1. Validate the request
//! 2. Look up every liked title and max-pool the neighbor scores
//! 3. Rank: sort, drop the liked titles, keep the top N
//! 4. Attach display metadata
//!
//! The orchestrator is built from already-loaded artifacts, so holding one
//! means the model is ready. It keeps no per-request state and can be
//! shared freely between threads.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use data_loader::{Artifacts, DataLoadError};
use knn_index::{BruteForceIndex, NeighborIndex};
use pipeline::{aggregate, MetadataEnricher, Ranker, Recommendation, DEFAULT_FAN_OUT};
use sources::{NeighborSource, SeedContext};

use crate::error::{RecommendError, RecommendResult};

/// Default number of recommendations returned
pub const DEFAULT_RECOMMENDATIONS: usize = 10;

fn default_recommendations() -> usize {
    DEFAULT_RECOMMENDATIONS
}

/// A request for recommendations based on liked titles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Titles the user liked, in the order they were given
    pub liked_movie_titles: Vec<String>,

    /// Number of recommendations to return
    #[serde(default = "default_recommendations")]
    pub n_recommendations: usize,
}

impl RecommendationRequest {
    pub fn new<I, S>(liked: I, n_recommendations: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            liked_movie_titles: liked.into_iter().map(Into::into).collect(),
            n_recommendations,
        }
    }

    /// Reject requests that cannot produce anything useful
    pub fn validate(&self) -> RecommendResult<()> {
        if self.liked_movie_titles.is_empty() {
            return Err(RecommendError::InvalidRequest(
                "Please provide at least one movie title the user liked.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    artifacts: Arc<Artifacts>,
    source: NeighborSource,
    ranker: Arc<Ranker>,
    enricher: MetadataEnricher,
    fan_out: usize,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over loaded artifacts and a similarity index
    pub fn new(artifacts: Arc<Artifacts>, index: Arc<dyn NeighborIndex>) -> Self {
        let source = NeighborSource::new(artifacts.clone(), index);
        let enricher = MetadataEnricher::new(artifacts.clone());
        Self {
            artifacts,
            source,
            ranker: Arc::new(Ranker::new()),
            enricher,
            fan_out: DEFAULT_FAN_OUT,
        }
    }

    /// Create an orchestrator with the exhaustive cosine index over the
    /// artifacts' feature matrix
    pub fn from_artifacts(artifacts: Arc<Artifacts>) -> Self {
        let index = Arc::new(BruteForceIndex::new(artifacts.features.clone()));
        Self::new(artifacts, index)
    }

    /// Load the artifacts from `models_dir` and build the orchestrator
    pub fn load(models_dir: &Path) -> Result<Self, DataLoadError> {
        let start = Instant::now();
        let artifacts = Arc::new(Artifacts::load_from_dir(models_dir)?);
        let orchestrator = Self::from_artifacts(artifacts);
        info!("Recommender ready in {:.2?}", start.elapsed());
        Ok(orchestrator)
    }

    /// Configure neighbors fetched per liked title (default: 5)
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    /// Main entry point: recommendations for a set of liked titles
    ///
    /// # Returns
    /// Recommendations sorted by similarity (highest first), never containing
    /// a liked title, at most `n_recommendations` long.
    ///
    /// # Errors
    /// * `InvalidRequest` - no liked titles
    /// * `EmptyResult` - nothing to recommend (e.g. every title unknown)
    /// * `MetadataMissing` - artifacts are mismatched
    #[instrument(
        skip(self, request),
        fields(
            seeds = request.liked_movie_titles.len(),
            n = request.n_recommendations
        )
    )]
    pub fn recommend(&self, request: &RecommendationRequest) -> RecommendResult<Vec<Recommendation>> {
        let start_time = Instant::now();

        request.validate()?;
        let context = SeedContext::new(request.liked_movie_titles.iter().cloned());

        // Aggregate per-seed neighbors
        let scores = aggregate(&self.source, &context, self.fan_out);
        info!("Aggregated {} unique candidates", scores.len());

        // Rank and select top N
        let ranked = self
            .ranker
            .rank(scores, &context, request.n_recommendations)
            .map_err(|e| RecommendError::Internal(format!("Ranking failed: {:#}", e)))?;

        if ranked.is_empty() {
            info!("No recommendations survived ranking");
            return Err(RecommendError::EmptyResult);
        }

        // Attach metadata
        let recommendations = self.enricher.enrich_all(ranked)?;

        info!(
            "Selected {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );
        Ok(recommendations)
    }
}
