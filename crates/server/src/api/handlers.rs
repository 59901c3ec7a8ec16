use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use pipeline::Recommendation;

use crate::error::{RecommendError, RecommendResult};
use crate::orchestrator::RecommendationRequest;

use super::{AppState, Readiness};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Health check endpoint: reports whether the model is loaded
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, model_loaded) = match state.readiness().await {
        Readiness::Ready(_) => ("ready", true),
        Readiness::Loading => ("loading", false),
        Readiness::Failed(_) => ("model_loading_failed", false),
    };

    Json(HealthResponse {
        status: status.to_string(),
        model_loaded,
    })
}

/// Recommendations for the titles a user liked
pub async fn recommend_for_user(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> RecommendResult<Json<Vec<Recommendation>>> {
    let Json(request) = payload?;

    // Bad input is rejected even before the model is ready
    request.validate()?;

    let orchestrator = state.orchestrator().await?;

    // The pipeline is CPU-bound; keep it off the async workers
    let recommendations = tokio::task::spawn_blocking(move || orchestrator.recommend(&request))
        .await
        .map_err(|e| {
            error!("Recommendation task panicked: {}", e);
            RecommendError::Internal("Recommendation task failed".to_string())
        })??;

    info!("Returning {} recommendations", recommendations.len());
    Ok(Json(recommendations))
}
