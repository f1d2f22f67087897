use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Icon shown inside the theme toggle while this theme is applied.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Dark => "fas fa-moon",
            Self::Light => "fas fa-sun",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Info | Self::Error => "exclamation-circle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Dismissing,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Local>,
    /// Scheduler time at which the notification was mounted.
    pub shown_at: Duration,
    pub phase: NotificationPhase,
}

impl Notification {
    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.severity.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.top && offset < self.top + self.height
    }

    pub fn anchor(&self) -> String {
        format!("#{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub id: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabBinding {
    pub tab: String,
    pub pane: String,
}

impl TabBinding {
    pub fn for_tab(tab: impl Into<String>) -> Self {
        let tab = tab.into();
        let pane = format!("{tab}-tab");
        Self { tab, pane }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabLayout {
    pub id: String,
    #[serde(default)]
    pub active: bool,
}

/// Geometry and element inventory of the page the engine drives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub sections: Vec<SectionBounds>,
    #[serde(default)]
    pub nav_links: Vec<NavLink>,
    #[serde(default)]
    pub tabs: Vec<TabLayout>,
    #[serde(default)]
    pub elements: Vec<String>,
}

impl Default for PageLayout {
    fn default() -> Self {
        let sections = [
            ("home", 0.0, 820.0),
            ("features", 820.0, 1100.0),
            ("architecture", 1920.0, 900.0),
            ("docs", 2820.0, 760.0),
            ("examples", 3580.0, 980.0),
        ];
        let tabs = ["basic", "plugins", "websocket"];

        Self {
            sections: sections
                .iter()
                .map(|(id, top, height)| SectionBounds::new(*id, *top, *height))
                .collect(),
            nav_links: sections
                .iter()
                .map(|(id, _, _)| NavLink {
                    id: format!("nav-{id}"),
                    href: format!("#{id}"),
                })
                .collect(),
            tabs: tabs
                .iter()
                .enumerate()
                .map(|(index, id)| TabLayout {
                    id: id.to_string(),
                    active: index == 0,
                })
                .collect(),
            elements: [
                "theme-toggle",
                "back-to-top",
                "mobile-menu-btn",
                "github-stars",
                "github-stars-count",
                "github-forks",
                "npm-version",
                "latest-version",
                "npm-downloads",
                "total-downloads",
            ]
            .iter()
            .map(|id| id.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatSnapshot {
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub version: Option<String>,
    pub downloads: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub stargazers_count: u64,
    pub forks_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageResponse {
    #[serde(rename = "dist-tags")]
    pub dist_tags: DistTags,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistTags {
    pub latest: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadsResponse {
    pub downloads: Vec<DailyDownloads>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyDownloads {
    pub downloads: u64,
    #[serde(default)]
    pub day: Option<String>,
}

impl DownloadsResponse {
    pub fn total(&self) -> u64 {
        self.downloads
            .iter()
            .fold(0u64, |sum, day| sum.saturating_add(day.downloads))
    }
}
