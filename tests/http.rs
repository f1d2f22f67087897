use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use reqwest::Client;
use serde_json::{Value, json};
use site_engine::app::refresh_loop;
use site_engine::config::{Endpoints, Timings};
use site_engine::document::PageDocument;
use site_engine::fetch::{
    LOADING_TEXT, PACKAGE_FAILURE_MESSAGE, REPO_FAILURE_MESSAGE, StatsClient, refresh_all,
    refresh_package_stats, refresh_repo_stats,
};
use site_engine::models::{PageLayout, Severity};
use site_engine::storage::MemoryStore;
use site_engine::{SiteState, UiState};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone, Default)]
struct MockApi {
    repo_down: Arc<AtomicBool>,
    repo_hits: Arc<AtomicUsize>,
    downloads_down: Arc<AtomicBool>,
    downloads_hits: Arc<AtomicUsize>,
}

async fn repo(State(api): State<MockApi>) -> Result<Json<Value>, StatusCode> {
    api.repo_hits.fetch_add(1, Ordering::SeqCst);
    if api.repo_down.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "full_name": "anasbex-dev/keypointjs",
        "stargazers_count": 42,
        "forks_count": 7
    })))
}

async fn malformed_repo() -> Json<Value> {
    Json(json!({ "stars": 42 }))
}

async fn package() -> Json<Value> {
    Json(json!({
        "name": "keypointjs",
        "dist-tags": { "latest": "2.1.0", "next": "3.0.0-beta.1" }
    }))
}

async fn downloads(State(api): State<MockApi>) -> Result<Json<Value>, StatusCode> {
    api.downloads_hits.fetch_add(1, Ordering::SeqCst);
    if api.downloads_down.load(Ordering::SeqCst) {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!({
        "start": "2025-10-18",
        "end": "2026-10-17",
        "package": "keypointjs",
        "downloads": [
            { "downloads": 1200, "day": "2026-10-15" },
            { "downloads": 0, "day": "2026-10-16" },
            { "downloads": 34, "day": "2026-10-17" }
        ]
    })))
}

struct TestApi {
    base_url: String,
    api: MockApi,
}

async fn spawn_api() -> TestApi {
    let api = MockApi::default();
    let app = Router::new()
        .route("/repos/keypointjs", get(repo))
        .route("/repos/malformed", get(malformed_repo))
        .route("/keypointjs", get(package))
        .route("/downloads/range/last-year/keypointjs", get(downloads))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApi {
        base_url: format!("http://{addr}"),
        api,
    }
}

fn endpoints(base_url: &str) -> Endpoints {
    Endpoints {
        repo: format!("{base_url}/repos/keypointjs"),
        package: format!("{base_url}/keypointjs"),
        downloads: format!("{base_url}/downloads/range/last-year/keypointjs"),
    }
}

fn site(endpoints: Endpoints) -> SiteState {
    let ui = UiState::initialize(
        Box::new(PageDocument::from_layout(&PageLayout::default())),
        Box::new(MemoryStore::default()),
        &Timings::default(),
    );
    SiteState::new(ui, StatsClient::with_client(Client::new(), endpoints))
}

async fn text(state: &SiteState, id: &str) -> Option<String> {
    state.ui.lock().await.document().text_content(id)
}

async fn error_notifications(state: &SiteState) -> Vec<String> {
    state
        .ui
        .lock()
        .await
        .notifications()
        .live()
        .iter()
        .filter(|n| n.severity == Severity::Error)
        .map(|n| n.message.clone())
        .collect()
}

async fn finish_animations(state: &SiteState) {
    let mut ui = state.ui.lock().await;
    let until = ui.now() + Duration::from_millis(2100);
    ui.advance(until);
}

#[tokio::test]
async fn repo_stats_fill_star_and_fork_counters() {
    let server = spawn_api().await;
    let state = site(endpoints(&server.base_url));

    refresh_repo_stats(&state).await;
    finish_animations(&state).await;

    assert_eq!(text(&state, "github-stars").await.as_deref(), Some("42"));
    assert_eq!(text(&state, "github-stars-count").await.as_deref(), Some("42"));
    assert_eq!(text(&state, "github-forks").await.as_deref(), Some("7"));
    assert!(error_notifications(&state).await.is_empty());
}

#[tokio::test]
async fn failing_repo_endpoint_notifies_once_and_keeps_values() {
    let server = spawn_api().await;
    let state = site(endpoints(&server.base_url));

    refresh_repo_stats(&state).await;
    finish_animations(&state).await;

    server.api.repo_down.store(true, Ordering::SeqCst);
    refresh_repo_stats(&state).await;
    finish_animations(&state).await;

    assert_eq!(error_notifications(&state).await, vec![REPO_FAILURE_MESSAGE.to_string()]);
    assert_eq!(text(&state, "github-stars").await.as_deref(), Some("42"));
    assert_eq!(text(&state, "github-forks").await.as_deref(), Some("7"));
    assert_eq!(state.ui.lock().await.snapshot().stars, Some(42));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let state = site(endpoints(&dead));

    refresh_repo_stats(&state).await;

    assert_eq!(error_notifications(&state).await.len(), 1);
    assert_eq!(text(&state, "github-stars").await.as_deref(), Some(""));
}

#[tokio::test]
async fn malformed_payload_is_reported_like_a_failure() {
    let server = spawn_api().await;
    let mut targets = endpoints(&server.base_url);
    targets.repo = format!("{}/repos/malformed", server.base_url);
    let state = site(targets);

    refresh_repo_stats(&state).await;

    assert_eq!(error_notifications(&state).await, vec![REPO_FAILURE_MESSAGE.to_string()]);
}

#[tokio::test]
async fn package_stats_show_version_then_summed_downloads() {
    let server = spawn_api().await;
    let state = site(endpoints(&server.base_url));

    refresh_package_stats(&state).await;

    assert_eq!(text(&state, "npm-version").await.as_deref(), Some("2.1.0"));
    assert_eq!(text(&state, "latest-version").await.as_deref(), Some("v2.1.0"));
    assert_eq!(text(&state, "npm-downloads").await.as_deref(), Some("1,234+"));

    finish_animations(&state).await;
    assert_eq!(text(&state, "total-downloads").await.as_deref(), Some("1,234"));
    assert_eq!(state.ui.lock().await.snapshot().downloads, Some(1234));
}

#[tokio::test]
async fn failing_downloads_endpoint_degrades_silently() {
    let server = spawn_api().await;
    server.api.downloads_down.store(true, Ordering::SeqCst);
    let state = site(endpoints(&server.base_url));

    refresh_package_stats(&state).await;

    assert_eq!(text(&state, "npm-version").await.as_deref(), Some("2.1.0"));
    assert_eq!(text(&state, "npm-downloads").await.as_deref(), Some(LOADING_TEXT));
    assert!(error_notifications(&state).await.is_empty());
}

#[tokio::test]
async fn failing_package_endpoint_skips_downloads() {
    let server = spawn_api().await;
    let mut targets = endpoints(&server.base_url);
    targets.package = format!("{}/missing", server.base_url);
    let state = site(targets);

    refresh_package_stats(&state).await;

    assert_eq!(error_notifications(&state).await, vec![PACKAGE_FAILURE_MESSAGE.to_string()]);
    assert_eq!(server.api.downloads_hits.load(Ordering::SeqCst), 0);
    assert_eq!(text(&state, "npm-version").await.as_deref(), Some(""));
}

#[tokio::test]
async fn refresh_all_populates_every_target() {
    let server = spawn_api().await;
    let state = site(endpoints(&server.base_url));

    refresh_all(&state).await;
    finish_animations(&state).await;

    let ui = state.ui.lock().await;
    let snapshot = ui.snapshot();
    assert_eq!(snapshot.stars, Some(42));
    assert_eq!(snapshot.forks, Some(7));
    assert_eq!(snapshot.version.as_deref(), Some("2.1.0"));
    assert_eq!(snapshot.downloads, Some(1234));
    assert!(ui.notifications().live().is_empty());
}

#[tokio::test]
async fn refresh_loop_fetches_at_start_then_every_period() {
    let server = spawn_api().await;
    let state = site(endpoints(&server.base_url));

    let refresher = tokio::spawn(refresh_loop(state.clone(), Duration::from_millis(300)));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(server.api.repo_hits.load(Ordering::SeqCst), 1);
    assert_eq!(state.ui.lock().await.snapshot().stars, Some(42));
    assert_eq!(text(&state, "npm-version").await.as_deref(), Some("2.1.0"));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(server.api.repo_hits.load(Ordering::SeqCst), 2);
    assert_eq!(server.api.downloads_hits.load(Ordering::SeqCst), 2);

    refresher.abort();
    let _ = refresher.await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(server.api.repo_hits.load(Ordering::SeqCst), 2);
}
