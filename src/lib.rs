pub mod app;
pub mod config;
pub mod counter;
pub mod document;
pub mod errors;
pub mod fetch;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod sections;
pub mod state;
pub mod storage;
pub mod tabs;
pub mod theme;

pub use app::run;
pub use config::SiteConfig;
pub use state::{Event, SiteState, UiState};
