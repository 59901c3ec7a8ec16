use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pipeline::MetadataMissing;
use serde_json::json;

/// Outcomes of a recommendation request that are not a result list.
///
/// Per-seed and per-field problems never show up here; they are absorbed in
/// the pipeline. What remains are the cases a caller has to tell apart.
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    /// Bad client input, rejected before any artifact is touched
    #[error("{0}")]
    InvalidRequest(String),

    /// Request body that is not a valid request document
    #[error("{}", .0.body_text())]
    MalformedBody(#[from] JsonRejection),

    /// Artifacts are not loaded (yet, or loading failed)
    #[error("Recommendation model artifacts are not loaded.")]
    NotReady,

    /// Nothing survived the pipeline, e.g. every seed was unknown
    #[error("Could not find recommendations. Check if titles are spelled correctly or if the user is a cold-start user.")]
    EmptyResult,

    /// A ranked title has no metadata row: the artifacts are mismatched
    #[error("Artifact mismatch: {0}")]
    MetadataMissing(#[from] MetadataMissing),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RecommendError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecommendError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RecommendError::MalformedBody(rejection) => rejection.status(),
            RecommendError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            RecommendError::EmptyResult => StatusCode::NOT_FOUND,
            RecommendError::MetadataMissing(_) | RecommendError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RecommendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type RecommendResult<T> = Result<T, RecommendError>;
