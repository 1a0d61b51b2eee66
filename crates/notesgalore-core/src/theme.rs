use crate::prefs::PreferenceStore;

pub const COLOR_THEME_KEY: &str = "color-theme";
pub const DARK_CLASS: &str = "dark";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, ThemePreference::Dark)
    }
}

/// Global style flag the active theme is mirrored into (the `dark` class on
/// the document body in a browser shell).
pub trait StyleScope {
    fn set_class(&mut self, class: &str, enabled: bool);
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }
}

impl StyleScope for ClassList {
    fn set_class(&mut self, class: &str, enabled: bool) {
        if enabled {
            if !self.contains(class) {
                self.classes.push(class.to_string());
            }
        } else {
            self.classes.retain(|existing| existing != class);
        }
    }
}

/// Light/dark switch backed by a preference store.
pub struct ThemeToggle<P, S> {
    store: P,
    scope: S,
    current: ThemePreference,
}

impl<P: PreferenceStore, S: StyleScope> ThemeToggle<P, S> {
    /// Reads the stored theme, falling back to `fallback` when the key is
    /// missing or holds an unknown value, and applies it to the scope.
    pub fn mount(store: P, scope: S, fallback: ThemePreference) -> Self {
        let current = store
            .get(COLOR_THEME_KEY)
            .and_then(|raw| ThemePreference::from_str(&raw))
            .unwrap_or(fallback);
        let mut toggle = Self {
            store,
            scope,
            current,
        };
        toggle.apply();
        toggle
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current.is_dark()
    }

    pub fn toggle(&mut self) -> ThemePreference {
        self.set(self.current.flipped());
        self.current
    }

    pub fn set(&mut self, theme: ThemePreference) {
        self.current = theme;
        self.store.set(COLOR_THEME_KEY, theme.as_str());
        self.apply();
        tracing::info!(theme = theme.as_str(), "theme changed");
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }

    pub fn into_parts(self) -> (P, S) {
        (self.store, self.scope)
    }

    fn apply(&mut self) {
        self.scope.set_class(DARK_CLASS, self.current.is_dark());
    }
}
