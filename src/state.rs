use crate::config::Timings;
use crate::counter::CounterBank;
use crate::document::Document;
use crate::fetch::StatsClient;
use crate::models::{NotificationId, Severity, StatSnapshot, TabBinding, Theme};
use crate::notify::NotificationQueue;
use crate::scheduler::{Scheduler, Task, TimerQueue};
use crate::sections::{ACTIVE_CLASS, SectionTracker};
use crate::storage::PreferenceStore;
use crate::tabs::TabSwitcher;
use crate::theme::ThemeController;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use tracing::{debug, warn};

pub const MOBILE_MENU_ID: &str = "mobile-menu";

/// Discrete inputs the page reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Scroll(f64),
    ToggleTheme,
    SelectTab(String),
    ToggleMobileMenu,
    CloseMobileMenu,
    /// A link inside the mobile menu: closes the menu, then follows `#id` hrefs.
    MobileLink(String),
    BackToTop,
    FollowAnchor(String),
    Copy(String),
    Notify { message: String, severity: Severity },
}

impl Event {
    /// Parses one driver command, e.g. `scroll 640` or `tab plugins`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "scroll" => rest.parse().ok().map(Self::Scroll),
            "theme" => Some(Self::ToggleTheme),
            "tab" if !rest.is_empty() => Some(Self::SelectTab(rest.to_string())),
            "menu" => Some(Self::ToggleMobileMenu),
            "close" => Some(Self::CloseMobileMenu),
            "mlink" if !rest.is_empty() => Some(Self::MobileLink(rest.to_string())),
            "top" => Some(Self::BackToTop),
            "goto" if !rest.is_empty() => Some(Self::FollowAnchor(rest.to_string())),
            "copy" if !rest.is_empty() => Some(Self::Copy(rest.to_string())),
            "notify" => {
                let (severity, message) = rest.split_once(' ')?;
                Some(Self::Notify {
                    message: message.trim().to_string(),
                    severity: Severity::parse(severity)?,
                })
            }
            _ => None,
        }
    }
}

/// Everything the page behaviour layer owns, created once at load.
pub struct UiState {
    document: Box<dyn Document>,
    prefs: Box<dyn PreferenceStore>,
    timers: TimerQueue,
    theme: ThemeController,
    sections: SectionTracker,
    tabs: TabSwitcher,
    counters: CounterBank,
    notifications: NotificationQueue,
    snapshot: StatSnapshot,
    mobile_menu_open: bool,
}

impl UiState {
    pub fn initialize(
        mut document: Box<dyn Document>,
        prefs: Box<dyn PreferenceStore>,
        timings: &Timings,
    ) -> Self {
        let theme = ThemeController::initialize(document.as_mut(), prefs.as_ref());
        let tabs = TabSwitcher::initialize(document.as_mut());

        let mut state = Self {
            document,
            prefs,
            timers: TimerQueue::new(),
            theme,
            sections: SectionTracker::new(timings),
            tabs,
            counters: CounterBank::new(timings),
            notifications: NotificationQueue::new(timings),
            snapshot: StatSnapshot::default(),
            mobile_menu_open: false,
        };
        state.handle(Event::Scroll(0.0));
        state
    }

    pub fn handle(&mut self, event: Event) {
        debug!(?event, "event");
        match event {
            Event::Scroll(offset) => {
                self.sections.evaluate(self.document.as_mut(), offset);
            }
            Event::ToggleTheme => {
                self.theme
                    .toggle(self.document.as_mut(), self.prefs.as_mut());
            }
            Event::SelectTab(tab) => {
                self.tabs.select(self.document.as_mut(), &tab);
            }
            Event::ToggleMobileMenu => self.toggle_mobile_menu(),
            Event::CloseMobileMenu => self.close_mobile_menu(),
            Event::MobileLink(href) => {
                self.close_mobile_menu();
                self.sections.scroll_to_anchor(self.document.as_mut(), &href);
            }
            Event::BackToTop => self.sections.scroll_to_top(self.document.as_mut()),
            Event::FollowAnchor(href) => {
                self.sections.scroll_to_anchor(self.document.as_mut(), &href);
            }
            Event::Copy(text) => self.copy_to_clipboard(&text),
            Event::Notify { message, severity } => {
                self.notify(message, severity);
            }
        }
    }

    /// Runs every timer due at or before `now`.
    pub fn advance(&mut self, now: Duration) {
        while let Some((_, task)) = self.timers.pop_due(now) {
            match task {
                Task::CounterTick { element } => {
                    self.counters
                        .tick(self.document.as_mut(), &mut self.timers, &element);
                }
                Task::BeginDismiss(id) => {
                    self.notifications
                        .begin_dismiss(self.document.as_mut(), &mut self.timers, id);
                }
                Task::RemoveNotification(id) => {
                    self.notifications.remove(self.document.as_mut(), id);
                }
            }
        }
        self.timers.advance_to(now);
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        self.notifications
            .notify(self.document.as_mut(), &mut self.timers, message, severity)
    }

    pub fn animate(&mut self, element: &str, target: u64) {
        self.counters
            .animate(self.document.as_mut(), &mut self.timers, element, target);
    }

    pub fn set_text(&mut self, element: &str, text: &str) -> bool {
        self.document.set_text(element, text)
    }

    pub fn copy_to_clipboard(&mut self, text: &str) {
        if self.document.write_clipboard(text) {
            self.notify("Code copied to clipboard!", Severity::Success);
        } else {
            warn!("clipboard write rejected");
            self.notify("Failed to copy code", Severity::Error);
        }
    }

    fn toggle_mobile_menu(&mut self) {
        if !self.document.contains(MOBILE_MENU_ID) {
            self.document.insert_element(MOBILE_MENU_ID);
            self.mobile_menu_open = false;
        }
        self.mobile_menu_open = !self.mobile_menu_open;
        self.document
            .set_class(MOBILE_MENU_ID, ACTIVE_CLASS, self.mobile_menu_open);
    }

    fn close_mobile_menu(&mut self) {
        if !self.mobile_menu_open {
            return;
        }
        self.mobile_menu_open = false;
        self.document.set_class(MOBILE_MENU_ID, ACTIVE_CLASS, false);
    }

    pub fn document(&self) -> &dyn Document {
        self.document.as_ref()
    }

    pub fn snapshot(&self) -> &StatSnapshot {
        &self.snapshot
    }

    pub fn snapshot_mut(&mut self) -> &mut StatSnapshot {
        &mut self.snapshot
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.sections.active()
    }

    pub fn active_tab(&self) -> Option<&TabBinding> {
        self.tabs.active()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }
}

#[derive(Clone)]
pub struct SiteState {
    pub ui: Arc<Mutex<UiState>>,
    pub client: StatsClient,
    started: Instant,
}

impl SiteState {
    pub fn new(ui: UiState, client: StatsClient) -> Self {
        Self {
            ui: Arc::new(Mutex::new(ui)),
            client,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Locks the page state with its clock caught up to the runtime.
    pub async fn lock(&self) -> MutexGuard<'_, UiState> {
        let mut ui = self.ui.lock().await;
        ui.advance(self.elapsed());
        ui
    }

    /// Fires timers that came due since the last pump.
    pub async fn pump(&self) {
        drop(self.lock().await);
    }

    pub async fn handle(&self, event: Event) {
        self.lock().await.handle(event);
    }
}
