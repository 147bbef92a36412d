//! Two-valued theme flag persisted in an opaque string store.

use log::debug;
use std::{cell::RefCell, collections::HashMap};

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    /// Icon shown on the toggle: the sun offers light mode, the moon dark mode.
    pub fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }

    /// Value of the `data-theme` attribute on `<body>`; light removes it.
    pub fn body_attribute(self) -> Option<&'static str> {
        match self {
            Self::Light => None,
            Self::Dark => Some("dark"),
        }
    }
}

pub trait ThemeStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Default)]
pub struct MemoryThemeStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryThemeStore {
    pub fn with_value(value: &str) -> Self {
        let store = Self::default();
        store.set(THEME_KEY, value);
        store
    }
}

impl ThemeStore for MemoryThemeStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

pub struct ThemeController<S: ThemeStore> {
    store: S,
    theme: Theme,
}

impl<S: ThemeStore> ThemeController<S> {
    /// Dark is the default: an absent or `"dark"` value applies dark and writes
    /// `"dark"` back. Anything else applies light, and a value that is not
    /// exactly `"light"` is normalised to it.
    pub fn load(store: S) -> Self {
        let stored = store.get(THEME_KEY);
        let theme = match stored.as_deref() {
            None => Theme::Dark,
            Some(value) => Theme::from_str(value).unwrap_or(Theme::Light),
        };

        if stored.as_deref() != Some(theme.as_str()) || theme == Theme::Dark {
            store.set(THEME_KEY, theme.as_str());
        }

        debug!("loaded theme {}", theme.as_str());
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.store.set(THEME_KEY, self.theme.as_str());
        self.theme
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_defaults_to_dark_and_persists() {
        let controller = ThemeController::load(MemoryThemeStore::default());

        assert_eq!(controller.theme(), Theme::Dark);
        assert_eq!(controller.store().get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn stored_light_is_respected() {
        let controller = ThemeController::load(MemoryThemeStore::with_value("light"));

        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.store().get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn unknown_value_applies_light_and_is_normalised() {
        let controller = ThemeController::load(MemoryThemeStore::with_value("sepia"));

        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.store().get(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn double_toggle_round_trips_and_store_agrees() {
        for initial in ["dark", "light"] {
            let mut controller = ThemeController::load(MemoryThemeStore::with_value(initial));
            let start = controller.theme();

            let once = controller.toggle();
            assert_eq!(once, start.toggled());
            assert_eq!(controller.store().get(THEME_KEY).as_deref(), Some(once.as_str()));

            let twice = controller.toggle();
            assert_eq!(twice, start);
            assert_eq!(controller.store().get(THEME_KEY).as_deref(), Some(start.as_str()));
        }
    }

    #[test]
    fn presentation_values() {
        assert_eq!(Theme::Dark.icon_class(), "fas fa-sun");
        assert_eq!(Theme::Light.icon_class(), "fas fa-moon");
        assert_eq!(Theme::Dark.body_attribute(), Some("dark"));
        assert_eq!(Theme::Light.body_attribute(), None);
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light theme");
        assert_eq!(Theme::from_str("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_str("Dark"), None);
    }
}
