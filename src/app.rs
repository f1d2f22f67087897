use crate::config::SiteConfig;
use crate::document::PageDocument;
use crate::fetch::{StatsClient, refresh_all};
use crate::state::{Event, SiteState, UiState};
use crate::storage::{JsonFileStore, load_layout};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

/// Builds the page state from configuration: theme first, then tabs and the
/// initial scroll evaluation.
pub async fn load(config: &SiteConfig) -> Result<SiteState, Box<dyn std::error::Error>> {
    let layout = load_layout(&config.layout_path).await;
    let document = PageDocument::from_layout(&layout);
    let prefs = JsonFileStore::load(&config.prefs_path).await;
    let ui = UiState::initialize(Box::new(document), Box::new(prefs), &config.timings);
    let client = StatsClient::new(config.endpoints.clone())?;
    Ok(SiteState::new(ui, client))
}

/// Drives the page until stdin closes, `quit` is read, or ctrl-c arrives.
pub async fn run(config: SiteConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = load(&config).await?;
    info!(
        layout = %config.layout_path.display(),
        prefs = %config.prefs_path.display(),
        "page loaded"
    );

    let refresher = tokio::spawn(refresh_loop(state.clone(), config.refresh_interval));
    let pump = tokio::spawn(pump_loop(state.clone(), config.timings.counter_tick));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "quit" {
                    break;
                }
                match Event::parse(line) {
                    Some(event) => state.handle(event).await,
                    None if line.is_empty() => {}
                    None => warn!(command = line, "unrecognised command"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("page unloaded");
    refresher.abort();
    pump.abort();
    Ok(())
}

/// Refreshes once immediately, then every `period`.
pub async fn refresh_loop(state: SiteState, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        refresh_all(&state).await;
    }
}

pub async fn pump_loop(state: SiteState, tick: Duration) {
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        state.pump().await;
    }
}
