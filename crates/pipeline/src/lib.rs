//! Aggregation and ranking pipeline for item-item recommendations.
//!
//! This crate provides:
//! - `aggregate`: max-pools the per-seed neighbor lists into one score map
//! - Filter trait, FilterPipeline and the Ranker that sorts, filters and
//!   truncates
//! - MetadataEnricher for the display fields (genres, cast, overview, id)
//!
//! ## Architecture
//! A request flows through the stages in order:
//! 1. Every seed is looked up (fan-out per seed) and the results merged
//! 2. Candidates are sorted by best similarity, seeds removed, top N kept
//! 3. Survivors are joined with the metadata table
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{aggregate, MetadataEnricher, Ranker, DEFAULT_FAN_OUT};
//!
//! let context = SeedContext::new(["Toy Story", "Heat"]);
//! let scores = aggregate(&source, &context, DEFAULT_FAN_OUT);
//! let ranked = Ranker::new().rank(scores, &context, 10)?;
//! let recommendations = MetadataEnricher::new(artifacts).enrich_all(ranked)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod aggregate;
pub mod ranking;
pub mod literal;
pub mod enrich;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
pub use aggregate::{aggregate, CandidateScores, DEFAULT_FAN_OUT};
pub use ranking::Ranker;
pub use enrich::{parse_name_list, top_cast, MetadataEnricher, MetadataMissing, Recommendation};
