use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Entry};
use crate::i18n::FALLBACK_LANGUAGE;
use crate::storage::{load_json, save_json, SharedStore};

pub const SETTINGS_KEY: &str = "userSettings";
pub const FAVORITES_KEY: &str = "favorites";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn label_key(self) -> &'static str {
        match self {
            Theme::Dark => "themeDark",
            Theme::Light => "themeLight",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

/// Fields missing from a stored record take their default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub language: String,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: FALLBACK_LANGUAGE.to_owned(),
            theme: Theme::Dark,
        }
    }
}

/// Favorite entry ids in insertion order. Uniqueness is kept by [`Favorites::toggle`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<String>,
}

impl Favorites {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    /// Adds `id` when absent, removes it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(index) = self.ids.iter().position(|fav| fav == id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(id.to_owned());
            true
        }
    }

    /// Entries for the stored ids; ids missing from `catalog` are skipped, not removed.
    pub fn resolve<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Entry> {
        self.ids.iter().filter_map(|id| catalog.find(id)).collect()
    }
}

/// Preferences and favorites persisted in a key/value area.
#[derive(Clone)]
pub struct PreferenceStore {
    store: SharedStore,
}

impl PreferenceStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Preferences {
        load_json(self.store.as_ref(), SETTINGS_KEY).unwrap_or_default()
    }

    pub fn save(&self, prefs: &Preferences) {
        match save_json(self.store.as_ref(), SETTINGS_KEY, prefs) {
            Ok(()) => debug!(language = %prefs.language, theme = %prefs.theme, "settings saved"),
            Err(e) => warn!(error = %e, "failed to persist settings"),
        }
    }

    pub fn load_favorites(&self) -> Favorites {
        load_json(self.store.as_ref(), FAVORITES_KEY).unwrap_or_default()
    }

    pub fn save_favorites(&self, favorites: &Favorites) {
        if let Err(e) = save_json(self.store.as_ref(), FAVORITES_KEY, favorites) {
            warn!(error = %e, "failed to persist favorites");
        }
    }
}
