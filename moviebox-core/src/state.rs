use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Entry};
use crate::config::AppConfig;
use crate::error::SessionError;
use crate::i18n::Translations;
use crate::loader::LoadOutcome;
use crate::notice::Notice;
use crate::prefs::{Favorites, PreferenceStore, Preferences, Theme};
use crate::session::{SessionManager, User};
use crate::storage::SharedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavTarget {
    Home,
    Trending,
    Favorites,
    Profile,
    /// Opens the external app URL and falls back to `Home`.
    ExternalApp,
}

impl NavTarget {
    pub const ALL: [NavTarget; 5] = [
        NavTarget::Home,
        NavTarget::Trending,
        NavTarget::Favorites,
        NavTarget::ExternalApp,
        NavTarget::Profile,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            NavTarget::Home => "navHome",
            NavTarget::Trending => "navTrending",
            NavTarget::Favorites => "navFavorites",
            NavTarget::Profile => "navProfile",
            NavTarget::ExternalApp => "navExternal",
        }
    }
}

/// Side effect the frontend must carry out after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    OpenUrl(String),
}

#[derive(Debug, Clone)]
pub struct StateSettings {
    pub notice_duration: Duration,
    pub external_app_url: String,
    pub embed_url: String,
}

impl Default for StateSettings {
    fn default() -> Self {
        AppConfig::default().into()
    }
}

impl From<AppConfig> for StateSettings {
    fn from(config: AppConfig) -> Self {
        Self {
            notice_duration: config.notice_duration(),
            external_app_url: config.links.external_app_url,
            embed_url: config.links.embed_url,
        }
    }
}

/// Everything the view is rendered from. All mutations go through these methods.
pub struct AppState {
    settings: StateSettings,
    store: SharedStore,
    session: SessionManager,
    user_prefs: Option<PreferenceStore>,
    catalog: Catalog,
    translations: Translations,
    loading: bool,
    preferences: Preferences,
    favorites: Favorites,
    nav: NavTarget,
    selected_category: Option<String>,
    now_playing: Option<String>,
    notice: Option<Notice>,
    login_error: Option<SessionError>,
}

impl AppState {
    /// Fresh state in the loading phase, with any stored session restored.
    pub fn new(store: SharedStore, settings: StateSettings) -> Self {
        let session = SessionManager::restore(store.clone());
        let mut state = Self {
            settings,
            store,
            session,
            user_prefs: None,
            catalog: Catalog::default(),
            translations: Translations::default(),
            loading: true,
            preferences: Preferences::default(),
            favorites: Favorites::default(),
            nav: NavTarget::Home,
            selected_category: None,
            now_playing: None,
            notice: None,
            login_error: None,
        };
        state.sync_session();
        state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn nav(&self) -> NavTarget {
        self.nav
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn login_error(&self) -> Option<&SessionError> {
        self.login_error.as_ref()
    }

    pub fn settings(&self) -> &StateSettings {
        &self.settings
    }

    /// Category shown by the home grid.
    pub fn active_category(&self) -> Option<&str> {
        self.selected_category
            .as_deref()
            .or_else(|| self.catalog.default_category())
    }

    pub fn now_playing(&self) -> Option<&Entry> {
        self.now_playing
            .as_deref()
            .and_then(|id| self.catalog.find(id))
    }

    /// Text for `key` in the current language.
    pub fn t(&self, key: &str) -> String {
        self.translations.text(&self.preferences.language, key)
    }

    pub fn apply_catalog(&mut self, outcome: LoadOutcome) {
        self.catalog = outcome.catalog;
        self.translations = outcome.translations;
        self.loading = false;
        let stale = self
            .selected_category
            .as_deref()
            .is_some_and(|name| self.catalog.category(name).is_none());
        if stale {
            self.selected_category = None;
        }
        if let Some(err) = outcome.error {
            debug!(error = %err, "catalog fell back to empty");
            self.show_alert(self.t("Error"), self.t("jsonError"));
        }
    }

    pub fn navigate(&mut self, target: NavTarget) -> Effect {
        if self.loading || !self.session.session().is_authenticated() {
            return Effect::None;
        }
        match target {
            NavTarget::ExternalApp => {
                self.nav = NavTarget::Home;
                Effect::OpenUrl(self.settings.external_app_url.clone())
            }
            target if target == self.nav => Effect::None,
            target => {
                debug!(?target, "navigate");
                self.nav = target;
                Effect::None
            }
        }
    }

    pub fn select_category(&mut self, name: &str) {
        if self.catalog.category(name).is_none() {
            warn!(category = name, "unknown category");
            return;
        }
        self.nav = NavTarget::Home;
        self.selected_category = Some(name.to_owned());
    }

    /// Puts `id` in the player. Unknown ids raise an alert instead.
    pub fn play(&mut self, id: &str) -> bool {
        if self.catalog.find(id).is_some() {
            self.now_playing = Some(id.to_owned());
            true
        } else {
            self.show_alert(self.t("Error"), self.t("notFound"));
            false
        }
    }

    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, SessionError> {
        let store = self.user_prefs.as_ref().ok_or(SessionError::NotAuthenticated)?;
        if !self.favorites.contains(id) && self.catalog.find(id).is_none() {
            warn!(id, "refusing to favorite an id missing from the catalog");
            return Ok(false);
        }
        let now_favorite = self.favorites.toggle(id);
        store.save_favorites(&self.favorites);
        Ok(now_favorite)
    }

    pub fn toggle_now_playing_favorite(&mut self) -> Result<bool, SessionError> {
        match self.now_playing.clone() {
            Some(id) => self.toggle_favorite(&id),
            None => Ok(false),
        }
    }

    pub fn change_theme(&mut self, theme: Theme) -> Result<(), SessionError> {
        let store = self.user_prefs.as_ref().ok_or(SessionError::NotAuthenticated)?;
        self.preferences.theme = theme;
        store.save(&self.preferences);
        Ok(())
    }

    pub fn change_language(&mut self, language: &str) -> Result<(), SessionError> {
        let store = self.user_prefs.as_ref().ok_or(SessionError::NotAuthenticated)?;
        self.preferences.language = language.to_owned();
        store.save(&self.preferences);
        Ok(())
    }

    /// Validation failures leave storage untouched and are kept for the login view.
    pub fn login(&mut self, email: &str, password: &str) -> Result<(), SessionError> {
        match self.session.login(email, password) {
            Ok(_) => {
                self.login_error = None;
                self.sync_session();
                Ok(())
            }
            Err(e) => {
                self.login_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.sync_session();
    }

    pub fn on_auth_state_changed(&mut self, user: Option<User>) {
        if self.session.user() == user.as_ref() {
            return;
        }
        self.session.on_auth_state_changed(user);
        self.sync_session();
    }

    /// Wipes the whole persisted area and signs out.
    pub fn reset_data(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored data");
        }
        info!("app data reset");
        self.session.on_auth_state_changed(None);
        self.sync_session();
    }

    pub fn open_embed(&mut self) {
        self.notice = Some(Notice::embed(
            self.t("externalContent"),
            self.settings.embed_url.clone(),
        ));
    }

    pub fn show_alert(&mut self, title: String, message: String) {
        self.notice = Some(Notice::alert(title, message));
    }

    pub fn close_notice(&mut self) {
        self.notice = None;
    }

    /// Closes an alert whose display time has elapsed.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let Some(notice) = &self.notice {
            if notice.is_expired(now, self.settings.notice_duration) {
                self.notice = None;
            }
        }
    }

    // Loads the signed-in user's data, or resets to in-memory defaults when signed out.
    fn sync_session(&mut self) {
        self.user_prefs = self.session.user_store().map(PreferenceStore::new);
        match &self.user_prefs {
            Some(store) => {
                self.preferences = store.load();
                self.favorites = store.load_favorites();
            }
            None => {
                self.preferences = Preferences::default();
                self.favorites = Favorites::default();
            }
        }
        self.nav = NavTarget::Home;
        self.now_playing = None;
    }
}
