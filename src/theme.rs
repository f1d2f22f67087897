use crate::document::Document;
use crate::models::Theme;
use crate::storage::{PreferenceStore, THEME_KEY};
use tracing::{info, warn};

pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const TOGGLE_ID: &str = "theme-toggle";

#[derive(Debug, Default)]
pub struct ThemeController {
    current: Theme,
}

impl ThemeController {
    /// Applies the persisted theme before anything else renders.
    pub fn initialize(document: &mut dyn Document, prefs: &dyn PreferenceStore) -> Self {
        let theme = match prefs.get(THEME_KEY) {
            Ok(Some(value)) => Theme::parse(&value).unwrap_or_else(|| {
                warn!(value, "ignoring unknown persisted theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("theme preference unavailable: {err}");
                Theme::default()
            }
        };

        apply(document, theme);
        Self { current: theme }
    }

    pub fn toggle(
        &mut self,
        document: &mut dyn Document,
        prefs: &mut dyn PreferenceStore,
    ) -> Theme {
        let applied = document
            .root_attribute(THEME_ATTRIBUTE)
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or(self.current);
        let next = applied.toggled();

        if let Err(err) = prefs.set(THEME_KEY, next.as_str()) {
            warn!("theme not persisted: {err}");
        }
        apply(document, next);
        self.current = next;
        info!(theme = next.as_str(), "theme toggled");
        next
    }

    pub fn current(&self) -> Theme {
        self.current
    }
}

fn apply(document: &mut dyn Document, theme: Theme) {
    document.set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
    document.set_icon(TOGGLE_ID, theme.icon_class());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::errors::StoreError;
    use crate::models::PageLayout;
    use crate::storage::MemoryStore;

    struct LockedStore;

    impl PreferenceStore for LockedStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::unavailable("storage disabled"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::unavailable("storage disabled"))
        }
    }

    fn page() -> PageDocument {
        PageDocument::from_layout(&PageLayout::default())
    }

    #[test]
    fn fresh_load_defaults_to_dark() {
        let mut document = page();
        let controller = ThemeController::initialize(&mut document, &MemoryStore::default());
        assert_eq!(controller.current(), Theme::Dark);
        assert_eq!(document.root_attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));
        assert_eq!(
            document.element(TOGGLE_ID).and_then(|e| e.icon.as_deref()),
            Some("fas fa-moon")
        );
    }

    #[test]
    fn persisted_theme_is_applied_on_load() {
        let mut document = page();
        let prefs = MemoryStore::with_entry(THEME_KEY, "light");
        ThemeController::initialize(&mut document, &prefs);
        assert_eq!(document.root_attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));
    }

    #[test]
    fn toggles_alternate_and_match_persisted_value() {
        let mut document = page();
        let mut prefs = MemoryStore::default();
        let mut controller = ThemeController::initialize(&mut document, &prefs);

        let mut expected = Theme::Dark;
        for _ in 0..5 {
            expected = expected.toggled();
            assert_eq!(controller.toggle(&mut document, &mut prefs), expected);
            let persisted = prefs.get(THEME_KEY).unwrap();
            assert_eq!(persisted.as_deref(), Some(expected.as_str()));
            assert_eq!(document.root_attribute(THEME_ATTRIBUTE), persisted);
        }
    }

    #[test]
    fn unavailable_store_still_applies_theme() {
        let mut document = page();
        let mut prefs = LockedStore;
        let mut controller = ThemeController::initialize(&mut document, &prefs);
        assert_eq!(controller.current(), Theme::Dark);

        controller.toggle(&mut document, &mut prefs);
        assert_eq!(document.root_attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));
        assert_eq!(
            document.element(TOGGLE_ID).and_then(|e| e.icon.as_deref()),
            Some("fas fa-sun")
        );
    }
}
