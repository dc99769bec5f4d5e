// ABOUTME: Router tests for gleaner-server driven through tower's oneshot.
// ABOUTME: Covers health, note scraping, podcast summaries and the JSON error mapping.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use gleaner_core::{Scraper, SiteProfile};
use gleaner_podcast::{PodcastService, SpotifyClient, SpotifyConfig};
use gleaner_server::{build_app, AppState, ErrorBody};
use httpmock::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

fn default_app() -> Router {
    let scraper = Scraper::builder().build().unwrap();
    build_app(AppState::new(scraper, None))
}

fn local_app(server: &MockServer, with_podcast: bool) -> Router {
    let scraper = Scraper::builder()
        .profile(SiteProfile::xiaohongshu().with_domains(&["127.0.0.1", "localhost"]))
        .build()
        .unwrap();
    let podcast = with_podcast.then(|| {
        let client = SpotifyClient::new(
            SpotifyConfig::new("id", "secret").base_url(server.base_url()),
        )
        .unwrap();
        PodcastService::new(client)
    });
    build_app(AppState::new(scraper, podcast))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get(default_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["podcast_enabled"], false);
}

#[tokio::test]
async fn scrape_off_domain_is_bad_request() {
    let uri = format!("/scrape?url={}", encode("https://example.com/p/1"));
    let (status, body) = get(default_app(), &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: ErrorBody = serde_json::from_value(body).unwrap();
    assert_eq!(err.code, "domain_mismatch");
    assert!(err.error.contains("domain mismatch"));
}

#[tokio::test]
async fn scrape_missing_url_is_rejected() {
    let response = default_app()
        .oneshot(Request::builder().uri("/scrape").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scrape_returns_extraction_result() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/explore/n1");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(
                r#"<html><head><meta property="og:title" content="Dumplings"></head>
                <body><span class="username">bao</span><div class="desc">Pork and chive.</div>
                <img src="https://sns-webpic-qc.xhscdn.com/d.jpg"></body></html>"#,
            );
    });

    let share = format!("看看 {} 好吃", server.url("/explore/n1"));
    let uri = format!("/scrape?url={}", encode(&share));
    let (status, body) = get(local_app(&server, false), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "title": "Dumplings",
            "author": "bao",
            "content": "Pork and chive.",
            "media": ["https://sns-webpic-qc.xhscdn.com/d.jpg"],
            "url": server.url("/explore/n1"),
        })
    );
}

#[tokio::test]
async fn scrape_fetch_failure_is_server_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/explore/gone");
        then.status(502);
    });

    let uri = format!("/scrape?url={}", encode(&server.url("/explore/gone")));
    let (status, body) = get(local_app(&server, false), &uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "fetch");
}

#[tokio::test]
async fn podcast_without_credentials_is_upstream_error() {
    let uri = format!(
        "/podcast?url={}",
        encode("https://open.spotify.com/episode/abc")
    );
    let (status, body) = get(default_app(), &uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "upstream");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("credentials not configured"));
}

#[tokio::test]
async fn podcast_returns_summary() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/token");
        then.status(200)
            .json_body(json!({"access_token": "tok", "expires_in": 3600}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/episodes/ep9");
        then.status(200).json_body(json!({
            "id": "ep9",
            "name": "Ep 9",
            "description": "01:30 - Intro\n12:45:10 - Deep dive",
            "release_date": "2025-01-01",
            "duration_ms": 45000,
            "images": [],
            "language": "en",
            "explicit": false,
            "show": {"name": "Show", "external_urls": {"spotify": "https://open.spotify.com/show/s"}}
        }));
    });

    let uri = format!(
        "/podcast?url={}",
        encode("https://open.spotify.com/episode/ep9?si=1")
    );
    let (status, body) = get(local_app(&server, true), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration"], "00:45");
    assert_eq!(
        body["timestamps"],
        json!([
            {"time": "01:30", "label": "Intro"},
            {"time": "12:45:10", "label": "Deep dive"}
        ])
    );
    assert_eq!(body["image"], Value::Null);
}

#[tokio::test]
async fn podcast_off_domain_is_bad_request() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method(POST).path("/api/token");
        then.status(200);
    });

    let uri = format!("/podcast?url={}", encode("https://www.xiaohongshu.com/explore/1"));
    let (status, body) = get(local_app(&server, true), &uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "domain_mismatch");
    token.assert_hits(0);
}
