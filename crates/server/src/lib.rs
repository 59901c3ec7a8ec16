//! Server crate for the movie recommendation service.
//!
//! This crate contains the orchestrator that runs the recommendation
//! pipeline, the error taxonomy callers see, the service configuration and
//! the HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use config::Config;
pub use error::{RecommendError, RecommendResult};
pub use orchestrator::{RecommendationOrchestrator, RecommendationRequest, DEFAULT_RECOMMENDATIONS};
pub use pipeline::Recommendation;
