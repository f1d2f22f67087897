use crate::document::Document;
use crate::models::TabBinding;
use crate::sections::ACTIVE_CLASS;
use tracing::{debug, warn};

/// Mutually exclusive selection over the page's tab buttons and panes.
#[derive(Debug, Default)]
pub struct TabSwitcher {
    bindings: Vec<TabBinding>,
    active: Option<usize>,
}

impl TabSwitcher {
    pub fn initialize(document: &mut dyn Document) -> Self {
        let bindings: Vec<TabBinding> = document
            .tab_ids()
            .into_iter()
            .map(TabBinding::for_tab)
            .collect();
        let marked: Vec<usize> = bindings
            .iter()
            .enumerate()
            .filter(|(_, binding)| document.has_class(&binding.tab, ACTIVE_CLASS))
            .map(|(index, _)| index)
            .collect();

        let initial = match marked.as_slice() {
            [] if bindings.is_empty() => None,
            [] => {
                warn!(tab = %bindings[0].tab, "no tab marked active, selecting the first");
                Some(0)
            }
            [only] => Some(*only),
            [first, ..] => {
                warn!(count = marked.len(), "several tabs marked active, keeping the first");
                Some(*first)
            }
        };

        let mut switcher = Self {
            bindings,
            active: None,
        };
        if let Some(index) = initial {
            switcher.activate(document, index);
        }
        switcher
    }

    /// Activates `tab` and its pane, deactivating every other pair in the same pass.
    pub fn select(&mut self, document: &mut dyn Document, tab: &str) -> bool {
        match self.bindings.iter().position(|binding| binding.tab == tab) {
            Some(index) => {
                self.activate(document, index);
                true
            }
            None => {
                warn!(tab, "unknown tab selected");
                false
            }
        }
    }

    pub fn active(&self) -> Option<&TabBinding> {
        self.active.and_then(|index| self.bindings.get(index))
    }

    pub fn bindings(&self) -> &[TabBinding] {
        &self.bindings
    }

    fn activate(&mut self, document: &mut dyn Document, index: usize) {
        for (position, binding) in self.bindings.iter().enumerate() {
            let selected = position == index;
            document.set_class(&binding.tab, ACTIVE_CLASS, selected);
            document.set_class(&binding.pane, ACTIVE_CLASS, selected);
        }
        self.active = Some(index);
        debug!(tab = %self.bindings[index].tab, "tab selected");
    }
}
