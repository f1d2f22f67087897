use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_REPO_API_URL: &str = "https://api.github.com/repos/anasbex-dev/keypointjs";
pub const DEFAULT_PACKAGE_API_URL: &str = "https://registry.npmjs.org/keypointjs";
pub const DEFAULT_DOWNLOADS_API_URL: &str =
    "https://api.npmjs.org/downloads/range/last-year/keypointjs";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub repo: String,
    pub package: String,
    pub downloads: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO_API_URL.to_string(),
            package: DEFAULT_PACKAGE_API_URL.to_string(),
            downloads: DEFAULT_DOWNLOADS_API_URL.to_string(),
        }
    }
}

/// Fixed delays and offsets of the page behaviour.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub counter_duration: Duration,
    pub counter_tick: Duration,
    pub notification_visible: Duration,
    pub notification_exit: Duration,
    pub section_bias: f64,
    pub back_to_top_threshold: f64,
    pub anchor_offset: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            counter_duration: Duration::from_millis(2000),
            counter_tick: Duration::from_millis(16),
            notification_visible: Duration::from_millis(3000),
            notification_exit: Duration::from_millis(300),
            section_bias: 100.0,
            back_to_top_threshold: 500.0,
            anchor_offset: 80.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub prefs_path: PathBuf,
    pub layout_path: PathBuf,
    pub endpoints: Endpoints,
    pub refresh_interval: Duration,
    pub timings: Timings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            prefs_path: PathBuf::from("data/prefs.json"),
            layout_path: PathBuf::from("data/layout.json"),
            endpoints: Endpoints::default(),
            refresh_interval: Duration::from_secs(300),
            timings: Timings::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies `SITE_*` overrides found through `lookup` on top of the defaults.
    /// A refresh interval that is not a positive whole number of seconds is ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("SITE_PREFS_PATH") {
            config.prefs_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("SITE_LAYOUT_PATH") {
            config.layout_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("SITE_REPO_API_URL") {
            config.endpoints.repo = url;
        }
        if let Some(url) = lookup("SITE_PACKAGE_API_URL") {
            config.endpoints.package = url;
        }
        if let Some(url) = lookup("SITE_DOWNLOADS_API_URL") {
            config.endpoints.downloads = url;
        }
        if let Some(secs) = lookup("SITE_REFRESH_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
        {
            config.refresh_interval = Duration::from_secs(secs);
        }

        config
    }
}
