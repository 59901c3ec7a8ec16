//! Filter implementations for the ranking pipeline.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod seed_exclusion;

// Re-export for convenience
pub use seed_exclusion::SeedExclusionFilter;
