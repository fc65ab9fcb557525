use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const FALLBACK_LANGUAGE: &str = "myanmar";

/// Languages offered in the profile form, as (code, label key).
pub const LANGUAGES: &[(&str, &str)] = &[("myanmar", "langMyanmar"), ("english", "langEnglish")];

/// language -> key -> text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations {
    table: HashMap<String, HashMap<String, String>>,
}

impl Translations {
    pub fn new(table: HashMap<String, HashMap<String, String>>) -> Self {
        Self { table }
    }

    /// Strings used when the catalog document could not be loaded.
    pub fn minimal() -> Self {
        let myanmar = HashMap::from([
            ("Error".to_owned(), "Error".to_owned()),
            (
                "jsonError".to_owned(),
                "ရုပ်ရှင်ဒေတာများ ဖတ်ယူနိုင်ခြင်း မရှိပါ (JSON Error)။".to_owned(),
            ),
        ]);
        Self::new(HashMap::from([(FALLBACK_LANGUAGE.to_owned(), myanmar)]))
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Looks `key` up in `lang`, then the fallback language, then the built-in default.
    pub fn text(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(FALLBACK_LANGUAGE, key))
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| builtin(key).to_owned())
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.table
            .get(lang)
            .and_then(|strings| strings.get(key))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

fn builtin(key: &str) -> &str {
    match key {
        "Error" => "Error",
        "jsonError" => "Could not read the movie data (JSON Error).",
        "notFound" => "Movie data not found.",
        "noContent" => "No Content Available",
        "trendingTitle" => "Trending Movies",
        "favoritesTitle" => "My Favorites",
        "noFavorites" => "No favorite movies added yet.",
        "profileTitle" => "User Profile",
        "settingsTitle" => "Settings",
        "themeLabel" => "Theme:",
        "languageLabel" => "Language:",
        "themeDark" => "Dark",
        "themeLight" => "Light",
        "langMyanmar" => "Myanmar",
        "langEnglish" => "English",
        "resetData" => "Reset App Data",
        "nowPlaying" => "Play Now",
        "externalContent" => "Open extra content",
        "navHome" => "Home",
        "navTrending" => "Trending",
        "navFavorites" => "Favorites",
        "navProfile" => "Profile",
        "navExternal" => "Apps",
        "loginTitle" => "Sign in",
        "emailLabel" => "Email",
        "passwordLabel" => "Password",
        "loginButton" => "Sign in",
        "logout" => "Sign out",
        "loading" => "Loading...",
        "addFavorite" => "Add to favorites",
        "removeFavorite" => "Remove from favorites",
        "openPlayer" => "Open player",
        "close" => "Close",
        other => other,
    }
}
