use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use data_loader::{Artifacts, FeatureMatrix, MetadataTable, MovieMetadata, TitleIndex};
use server::api::{create_router, AppState};
use server::RecommendationOrchestrator;

fn build_orchestrator() -> RecommendationOrchestrator {
    let titles = ["Toy Story", "Toy Story 2", "A Bug's Life", "Heat", "Ronin"];
    let rows = vec![
        vec![1.0, 0.0],
        vec![0.98, 0.02],
        vec![0.9, 0.1],
        vec![0.0, 1.0],
        vec![0.05, 0.95],
    ];
    let metadata = titles
        .iter()
        .enumerate()
        .map(|(i, title)| MovieMetadata {
            id: i as u32 + 1,
            title: title.to_string(),
            tmdb_id: if i == 2 { None } else { Some(100 + i as i64) },
            genres: json!("[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]"),
            cast: json!("[{'name': 'Tom Hanks'}, {'name': 'Tim Allen'}, {'name': 'Don Rickles'}, {'name': 'Jim Varney'}]"),
            overview: Some(format!("{} overview", title)),
        })
        .collect();

    let artifacts = Artifacts::new(
        TitleIndex::new(titles.iter().map(|t| t.to_string()).collect()),
        FeatureMatrix::from_rows(rows),
        MetadataTable::new(metadata),
    );
    RecommendationOrchestrator::from_artifacts(Arc::new(artifacts))
}

fn ready_app() -> Router {
    create_router(AppState::ready(build_orchestrator()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_recommendations(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recommendations/user/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_health() -> Request<Body> {
    Request::builder().uri("/health").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_when_ready() {
    let (status, body) = send(ready_app(), get_health()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ready", "model_loaded": true}));
}

#[tokio::test]
async fn test_health_while_loading_and_after_failure() {
    let state = AppState::new();
    let (_, body) = send(create_router(state.clone()), get_health()).await;
    assert_eq!(body, json!({"status": "loading", "model_loaded": false}));

    state.set_failed("missing titles.txt").await;
    let (_, body) = send(create_router(state), get_health()).await;
    assert_eq!(body, json!({"status": "model_loading_failed", "model_loaded": false}));
}

#[tokio::test]
async fn test_recommendations() {
    let request = post_recommendations(json!({
        "liked_movie_titles": ["Toy Story"],
        "n_recommendations": 10
    }));
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::OK);

    let recs = body.as_array().unwrap();
    assert!(!recs.is_empty() && recs.len() <= 10);
    assert_eq!(recs[0]["title"], "Toy Story 2");
    assert_eq!(recs[0]["tmdbId"], 101);
    assert_eq!(recs[0]["genres"], "Animation, Comedy");
    assert_eq!(recs[0]["cast"], "Tom Hanks, Tim Allen, Don Rickles");
    assert_eq!(recs[0]["overview"], "Toy Story 2 overview");
    assert!(recs.iter().all(|r| r["title"] != "Toy Story"));

    let sims: Vec<f64> = recs.iter().map(|r| r["similarity"].as_f64().unwrap()).collect();
    assert!(sims.windows(2).all(|w| w[0] >= w[1]));
    assert!(sims.iter().all(|s| (0.0..=1.0).contains(s)));

    let bug = recs.iter().find(|r| r["title"] == "A Bug's Life").unwrap();
    assert_eq!(bug["tmdbId"], Value::Null);
}

#[tokio::test]
async fn test_default_count_and_path_without_slash() {
    let request = Request::builder()
        .method("POST")
        .uri("/recommendations/user")
        .header("content-type", "application/json")
        .body(Body::from(json!({"liked_movie_titles": ["Heat"]}).to_string()))
        .unwrap();
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    // Only four other titles exist
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_empty_liked_titles_is_bad_request() {
    let request = post_recommendations(json!({"liked_movie_titles": []}));
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("at least one"));
}

#[tokio::test]
async fn test_empty_liked_titles_rejected_before_readiness() {
    let request = post_recommendations(json!({"liked_movie_titles": []}));
    let (status, _) = send(create_router(AppState::new()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_titles_are_not_found() {
    let request = post_recommendations(json!({"liked_movie_titles": ["Unknown Movie XYZ"]}));
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("cold-start"));
}

#[tokio::test]
async fn test_not_ready_is_service_unavailable() {
    let request = post_recommendations(json!({"liked_movie_titles": ["Toy Story"]}));
    let (status, _) = send(create_router(AppState::new()), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let state = AppState::new();
    state.set_failed("corrupt features.csv").await;
    let request = post_recommendations(json!({"liked_movie_titles": ["Toy Story"]}));
    let (status, _) = send(create_router(state), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_becomes_ready_after_load() {
    let state = AppState::new();
    state.set_ready(build_orchestrator()).await;

    let request = post_recommendations(json!({"liked_movie_titles": ["Heat"], "n_recommendations": 1}));
    let (status, body) = send(create_router(state), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "Ronin");
}

fn post_raw(body: &str, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/recommendations/user/");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_malformed_json_uses_detail_body() {
    let (status, body) = send(ready_app(), post_raw("{not json", Some("application/json"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_missing_field_uses_detail_body() {
    let (status, body) = send(
        ready_app(),
        post_raw(r#"{"n_recommendations": 5}"#, Some("application/json")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("liked_movie_titles"));
}

#[tokio::test]
async fn test_negative_count_uses_detail_body() {
    let request = post_recommendations(json!({
        "liked_movie_titles": ["Toy Story"],
        "n_recommendations": -1
    }));
    let (status, body) = send(ready_app(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_missing_content_type_uses_detail_body() {
    let body = json!({"liked_movie_titles": ["Toy Story"]}).to_string();
    let (status, body) = send(ready_app(), post_raw(&body, None)).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
}
