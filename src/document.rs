//! The page surface the engine reads from and writes to.
//!
//! Every mutation is keyed by element id and reports whether the target
//! existed; a missing element is never an error.

use crate::models::{NavLink, Notification, NotificationId, PageLayout, SectionBounds};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub trait Document: Send {
    fn contains(&self, id: &str) -> bool;
    fn insert_element(&mut self, id: &str);

    fn root_attribute(&self, name: &str) -> Option<String>;
    fn set_root_attribute(&mut self, name: &str, value: &str);

    fn text_content(&self, id: &str) -> Option<String>;
    fn set_text(&mut self, id: &str, text: &str) -> bool;
    fn set_icon(&mut self, id: &str, icon_class: &str) -> bool;
    fn set_class(&mut self, id: &str, class: &str, enabled: bool) -> bool;
    fn has_class(&self, id: &str, class: &str) -> bool;

    /// Section geometry in document order.
    fn sections(&self) -> Vec<SectionBounds>;
    fn nav_links(&self) -> Vec<NavLink>;
    /// Tab button ids in document order.
    fn tab_ids(&self) -> Vec<String>;
    fn scroll_to(&mut self, offset: f64);

    fn mount_notification(&mut self, notification: &Notification);
    fn mark_dismissing(&mut self, id: NotificationId) -> bool;
    fn remove_notification(&mut self, id: NotificationId) -> bool;

    fn write_clipboard(&mut self, text: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub text: String,
    pub icon: Option<String>,
    pub classes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedNotification {
    pub id: NotificationId,
    pub class_name: String,
    pub icon: &'static str,
    pub message: String,
    pub exiting: bool,
}

/// In-memory page model built from a [`PageLayout`].
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    elements: BTreeMap<String, Element>,
    root_attributes: BTreeMap<String, String>,
    sections: Vec<SectionBounds>,
    nav_links: Vec<NavLink>,
    tabs: Vec<String>,
    scroll_y: f64,
    notifications: Vec<MountedNotification>,
    clipboard: Option<String>,
    clipboard_blocked: bool,
}

impl PageDocument {
    pub fn from_layout(layout: &PageLayout) -> Self {
        let mut document = Self {
            sections: layout.sections.clone(),
            nav_links: layout.nav_links.clone(),
            tabs: layout.tabs.iter().map(|tab| tab.id.clone()).collect(),
            ..Self::default()
        };

        for id in &layout.elements {
            document.insert_element(id);
        }
        for link in &layout.nav_links {
            document.insert_element(&link.id);
        }
        for tab in &layout.tabs {
            document.insert_element(&tab.id);
            let pane = format!("{}-tab", tab.id);
            document.insert_element(&pane);
            if tab.active {
                document.set_class(&tab.id, "active", true);
                document.set_class(&pane, "active", true);
            }
        }

        document
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|element| element.text.as_str())
    }

    pub fn remove_element(&mut self, id: &str) {
        self.elements.remove(id);
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn notifications(&self) -> &[MountedNotification] {
        &self.notifications
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn block_clipboard(&mut self) {
        self.clipboard_blocked = true;
    }

    /// Ids of elements currently carrying `class`.
    pub fn with_class(&self, class: &str) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|(_, element)| element.classes.contains(class))
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

impl Document for PageDocument {
    fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn insert_element(&mut self, id: &str) {
        self.elements.entry(id.to_string()).or_default();
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.get(name).cloned()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        debug!(name, value, "root attribute");
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn text_content(&self, id: &str) -> Option<String> {
        self.text(id).map(str::to_string)
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                debug!(id, text, "text");
                element.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn set_icon(&mut self, id: &str, icon_class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.icon = Some(icon_class.to_string());
                true
            }
            None => false,
        }
    }

    fn set_class(&mut self, id: &str, class: &str, enabled: bool) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        let changed = if enabled {
            element.classes.insert(class.to_string())
        } else {
            element.classes.remove(class)
        };
        if changed {
            debug!(id, class, enabled, "class");
        }
        true
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|element| element.classes.contains(class))
    }

    fn sections(&self) -> Vec<SectionBounds> {
        self.sections.clone()
    }

    fn nav_links(&self) -> Vec<NavLink> {
        self.nav_links.clone()
    }

    fn tab_ids(&self) -> Vec<String> {
        self.tabs.clone()
    }

    fn scroll_to(&mut self, offset: f64) {
        debug!(offset, "scroll");
        self.scroll_y = offset.max(0.0);
    }

    fn mount_notification(&mut self, notification: &Notification) {
        debug!(id = notification.id.0, message = %notification.message, "notification mounted");
        self.notifications.push(MountedNotification {
            id: notification.id,
            class_name: notification.class_name(),
            icon: notification.severity.icon(),
            message: notification.message.clone(),
            exiting: false,
        });
    }

    fn mark_dismissing(&mut self, id: NotificationId) -> bool {
        match self.notifications.iter_mut().find(|mounted| mounted.id == id) {
            Some(mounted) => {
                mounted.exiting = true;
                true
            }
            None => false,
        }
    }

    fn remove_notification(&mut self, id: NotificationId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|mounted| mounted.id != id);
        let removed = self.notifications.len() != before;
        if removed {
            debug!(id = id.0, "notification removed");
        }
        removed
    }

    fn write_clipboard(&mut self, text: &str) -> bool {
        if self.clipboard_blocked {
            return false;
        }
        self.clipboard = Some(text.to_string());
        true
    }
}
