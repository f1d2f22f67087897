//! Live repository and package counters.
//!
//! Primary fetch failures are logged and surfaced as one error notification;
//! the secondary downloads fetch only logs. Displayed values are never rolled
//! back on failure.

use crate::config::Endpoints;
use crate::counter::format_count;
use crate::errors::FetchError;
use crate::models::{DownloadsResponse, PackageResponse, RepoResponse, Severity};
use crate::state::{SiteState, UiState};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{error, info, warn};

pub const REPO_FAILURE_MESSAGE: &str = "Failed to fetch GitHub data";
pub const PACKAGE_FAILURE_MESSAGE: &str = "Failed to fetch NPM data";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone)]
pub struct StatsClient {
    http: Client,
    endpoints: Endpoints,
}

impl StatsClient {
    pub fn new(endpoints: Endpoints) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(concat!("site_engine/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(http, endpoints))
    }

    pub fn with_client(http: Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub async fn repo_stats(&self) -> Result<RepoResponse, FetchError> {
        self.get_json(&self.endpoints.repo).await
    }

    pub async fn package_info(&self) -> Result<PackageResponse, FetchError> {
        self.get_json(&self.endpoints.package).await
    }

    pub async fn downloads(&self) -> Result<DownloadsResponse, FetchError> {
        self.get_json(&self.endpoints.downloads).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| FetchError::decode(url, err))
    }
}

pub async fn refresh_repo_stats(state: &SiteState) {
    match state.client.repo_stats().await {
        Ok(stats) => {
            let mut ui = state.lock().await;
            show_repo_stats(&mut ui, &stats);
        }
        Err(err) => {
            error!("error fetching GitHub stats: {err}");
            state
                .lock()
                .await
                .notify(REPO_FAILURE_MESSAGE, Severity::Error);
        }
    }
}

pub async fn refresh_package_stats(state: &SiteState) {
    let package = match state.client.package_info().await {
        Ok(package) => package,
        Err(err) => {
            error!("error fetching NPM stats: {err}");
            state
                .lock()
                .await
                .notify(PACKAGE_FAILURE_MESSAGE, Severity::Error);
            return;
        }
    };
    {
        let mut ui = state.lock().await;
        show_package_version(&mut ui, &package.dist_tags.latest);
    }

    match state.client.downloads().await {
        Ok(downloads) => {
            let mut ui = state.lock().await;
            show_downloads(&mut ui, downloads.total());
        }
        Err(err) => warn!("error fetching download stats: {err}"),
    }
}

/// Runs both refreshes concurrently; neither waits on the other.
pub async fn refresh_all(state: &SiteState) {
    tokio::join!(refresh_repo_stats(state), refresh_package_stats(state));
    info!("stats refreshed");
}

pub fn show_repo_stats(ui: &mut UiState, stats: &RepoResponse) {
    ui.set_text("github-stars", &format_count(stats.stargazers_count));
    ui.animate("github-stars-count", stats.stargazers_count);
    ui.animate("github-forks", stats.forks_count);

    let snapshot = ui.snapshot_mut();
    snapshot.stars = Some(stats.stargazers_count);
    snapshot.forks = Some(stats.forks_count);
}

pub fn show_package_version(ui: &mut UiState, version: &str) {
    ui.set_text("npm-version", version);
    ui.set_text("latest-version", &format!("v{version}"));
    ui.set_text("npm-downloads", LOADING_TEXT);
    ui.set_text("total-downloads", LOADING_TEXT);
    ui.snapshot_mut().version = Some(version.to_string());
}

pub fn show_downloads(ui: &mut UiState, total: u64) {
    ui.set_text("npm-downloads", &format!("{}+", format_count(total)));
    ui.animate("total-downloads", total);
    ui.snapshot_mut().downloads = Some(total);
}
