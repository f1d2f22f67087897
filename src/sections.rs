use crate::config::Timings;
use crate::document::Document;
use crate::models::SectionBounds;
use tracing::debug;

pub const BACK_TO_TOP_ID: &str = "back-to-top";
pub const ACTIVE_CLASS: &str = "active";
pub const VISIBLE_CLASS: &str = "visible";

/// Tracks which section the reader is in and mirrors it onto the nav links.
#[derive(Debug)]
pub struct SectionTracker {
    bias: f64,
    back_to_top_threshold: f64,
    anchor_offset: f64,
    active: Option<String>,
}

impl SectionTracker {
    pub fn new(timings: &Timings) -> Self {
        Self {
            bias: timings.section_bias,
            back_to_top_threshold: timings.back_to_top_threshold,
            anchor_offset: timings.anchor_offset,
            active: None,
        }
    }

    /// First section in document order whose `[top, top + height)` holds `offset`.
    pub fn section_at(sections: &[SectionBounds], offset: f64) -> Option<&SectionBounds> {
        sections.iter().find(|section| section.contains(offset))
    }

    pub fn evaluate(&mut self, document: &mut dyn Document, scroll_y: f64) -> Option<&str> {
        document.set_class(
            BACK_TO_TOP_ID,
            VISIBLE_CLASS,
            scroll_y > self.back_to_top_threshold,
        );

        let sections = document.sections();
        let anchor = Self::section_at(&sections, scroll_y + self.bias).map(SectionBounds::anchor);

        for link in document.nav_links() {
            let highlighted = anchor.as_deref() == Some(link.href.as_str());
            document.set_class(&link.id, ACTIVE_CLASS, highlighted);
        }

        let active = anchor.map(|anchor| anchor.trim_start_matches('#').to_string());
        if active != self.active {
            debug!(section = ?active, scroll_y, "active section changed");
        }
        self.active = active;
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn scroll_to_top(&self, document: &mut dyn Document) {
        document.scroll_to(0.0);
    }

    /// Scrolls to the section named by `href` (`#id`), leaving room for the header.
    pub fn scroll_to_anchor(&self, document: &mut dyn Document, href: &str) -> bool {
        let Some(id) = href.strip_prefix('#').filter(|id| !id.is_empty()) else {
            return false;
        };
        let target = document
            .sections()
            .into_iter()
            .find(|section| section.id == id);
        match target {
            Some(section) => {
                document.scroll_to(section.top - self.anchor_offset);
                true
            }
            None => false,
        }
    }
}
