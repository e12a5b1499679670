//! Exercises `JikanProvider` against a local axum stub of the Jikan API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Query},
    http::{header, Method, Request, StatusCode},
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use shelf_recs_api::api::{create_router, AppState};
use shelf_recs_api::error::AppError;
use shelf_recs_api::models::MediaType;
use shelf_recs_api::services::{JikanProvider, MediaProvider};

fn manga(id: u64, title: &str) -> Value {
    json!({
        "mal_id": id,
        "url": format!("https://myanimelist.net/manga/{}", id),
        "images": { "jpg": { "image_url": format!("{}.jpg", id), "large_image_url": null } },
        "title": title,
        "title_english": null,
        "type": "Manga",
        "chapters": 100 + id,
        "score": 8.5,
        "synopsis": format!("Synopsis of {}", title),
        "authors": [{ "mal_id": 1, "type": "people", "name": "Urasawa, Naoki" }],
        "genres": [{ "mal_id": 7, "type": "manga", "name": "Mystery" }]
    })
}

async fn search_manga(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    if q == "nothing" {
        return Json(json!({ "data": [] }));
    }
    // Jikan ranks partial matches first sometimes; the provider should pick the exact one
    Json(json!({ "data": [manga(99, "Monster Musume"), manga(1, "Monster")] }))
}

async fn manga_recommendations(Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    if id != 1 {
        return (StatusCode::NOT_FOUND, Json(json!({ "status": 404 })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "data": [
                { "entry": { "mal_id": 2, "title": "Pluto", "url": "u" }, "votes": 30 },
                { "entry": { "mal_id": 3, "title": "20th Century Boys", "url": "u" }, "votes": 20 },
                { "entry": { "mal_id": 4, "title": "Master Keaton", "url": "u" }, "votes": 10 }
            ]
        })),
    )
}

async fn manga_details(Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    let title = match id {
        2 => "Pluto",
        3 => "20th Century Boys",
        4 => "Master Keaton",
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "status": 404 }))),
    };
    (StatusCode::OK, Json(json!({ "data": manga(id, title) })))
}

async fn top_manga(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let prefix = params.get("type").cloned().unwrap_or_else(|| "manga".to_string());
    Json(json!({
        "data": (50..60).map(|id| manga(id, &format!("{} {}", prefix, id))).collect::<Vec<_>>()
    }))
}

async fn anime_down() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

/// Serves the stub on an ephemeral port and returns its base URL
async fn spawn_stub() -> String {
    let stub = Router::new()
        .route("/manga", get(search_manga))
        .route("/manga/:id", get(manga_details))
        .route("/manga/:id/recommendations", get(manga_recommendations))
        .route("/top/manga", get(top_manga))
        .route("/anime", get(anime_down))
        .route("/top/anime", get(anime_down));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn provider() -> JikanProvider {
    JikanProvider::new(spawn_stub().await, Duration::from_millis(1))
}

#[tokio::test]
async fn test_search_picks_exact_match() {
    let provider = provider().await;
    let item = provider
        .search(MediaType::Manga, "monster")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.mal_id, 1);
    assert_eq!(item.title.as_deref(), Some("Monster"));
}

#[tokio::test]
async fn test_search_without_results() {
    let provider = provider().await;
    let item = provider.search(MediaType::Manga, "nothing").await.unwrap();
    assert!(item.is_none());
}

#[tokio::test]
async fn test_recommendations_and_details() {
    let provider = provider().await;

    let recs = provider.recommendations(MediaType::Manga, 1).await.unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].entry.title.as_deref(), Some("Pluto"));

    let details = provider.details(MediaType::Manga, 3).await.unwrap();
    assert_eq!(details.title.as_deref(), Some("20th Century Boys"));
    assert_eq!(details.chapters, Some(103));
}

#[tokio::test]
async fn test_top_passes_type_filter() {
    let provider = provider().await;

    let top = provider.top(MediaType::Manhwa).await.unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].title.as_deref(), Some("manhwa 50"));

    let top = provider.top(MediaType::Manga).await.unwrap();
    assert_eq!(top[0].title.as_deref(), Some("manga 50"));
}

#[tokio::test]
async fn test_upstream_error_status_is_reported() {
    let provider = provider().await;
    let err = provider.top(MediaType::Anime).await.unwrap_err();
    match err {
        AppError::ExternalApi(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream exploded"));
        }
        other => panic!("expected ExternalApi, got {}", other),
    }
}

#[tokio::test]
async fn test_full_request_against_stub() {
    let state = AppState::new(Arc::new(provider().await));
    let app = create_router(state);

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/recommendations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "titles": ["Monster"] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["baseTitle"], "Monster");
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["title"], "Pluto");
    assert_eq!(recs[0]["creator"], "Urasawa, Naoki");
    assert_eq!(recs[0]["chapters"], 102);
    assert_eq!(recs[0]["image"], "2.jpg");
    assert_eq!(
        recs[0]["whyRecommended"],
        "Fans of Monster also enjoyed this (shared genres: Mystery)"
    );
    assert!(recs[0].get("episodes").is_none());
}

#[tokio::test]
async fn test_anime_upstream_failure_returns_500() {
    let app = create_router(AppState::new(Arc::new(provider().await)));

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/recommendations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "titles": ["Cowboy Bebop"], "mediaType": "anime" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("500"));
}
