//! Pure mapping from [`AppState`] to a description of what should be on screen.
//!
//! The frontend calls [`render`] after every transition and draws the result
//! as-is; nothing here touches storage or the network.

use crate::catalog::{Entry, TRENDING};
use crate::i18n::LANGUAGES;
use crate::notice::NoticeKind;
use crate::prefs::Theme;
use crate::state::{AppState, NavTarget};

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub theme: Theme,
    pub screen: Screen,
    pub notice: Option<NoticeView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading { label: String },
    Login(LoginView),
    Main(MainView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginView {
    pub title: String,
    pub email_label: String,
    pub password_label: String,
    pub submit_label: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainView {
    pub nav: Vec<NavItem>,
    /// Empty on the profile screen.
    pub menu: Vec<MenuItem>,
    pub player: Option<PlayerView>,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub target: NavTarget,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub category: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub id: String,
    pub title: String,
    pub src: String,
    pub is_favorite: bool,
    pub open_label: String,
    pub favorite_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Category(GridView),
    Trending(GridView),
    Favorites(GridView),
    Profile(ProfileView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub heading: Option<String>,
    pub cards: Vec<Card>,
    /// Shown instead of cards when there are none.
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub thumb: String,
    pub is_favorite: bool,
    pub play_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub title: String,
    pub email: String,
    pub settings_title: String,
    pub theme_label: String,
    pub themes: Vec<Choice<Theme>>,
    pub language_label: String,
    pub languages: Vec<Choice<String>>,
    pub reset_label: String,
    pub logout_label: String,
    pub embed_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice<T> {
    pub value: T,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoticeView {
    pub title: String,
    pub message: Option<String>,
    pub url: Option<String>,
    pub close_label: String,
}

pub fn render(state: &AppState) -> View {
    let theme = state.preferences().theme;
    let notice = state.notice().map(|notice| {
        let (message, url) = match &notice.kind {
            NoticeKind::Alert { message } => (Some(message.clone()), None),
            NoticeKind::Embed { url } => (None, Some(url.clone())),
        };
        NoticeView {
            title: notice.title.clone(),
            message,
            url,
            close_label: state.t("close"),
        }
    });

    let screen = if state.is_loading() {
        Screen::Loading {
            label: state.t("loading"),
        }
    } else if state.user().is_none() {
        Screen::Login(render_login(state))
    } else {
        Screen::Main(render_main(state))
    };

    View {
        theme,
        screen,
        notice,
    }
}

fn render_login(state: &AppState) -> LoginView {
    LoginView {
        title: state.t("loginTitle"),
        email_label: state.t("emailLabel"),
        password_label: state.t("passwordLabel"),
        submit_label: state.t("loginButton"),
        error: state.login_error().map(ToString::to_string),
    }
}

fn render_main(state: &AppState) -> MainView {
    let active = state.nav();
    let nav = NavTarget::ALL
        .iter()
        .map(|&target| NavItem {
            target,
            label: state.t(target.label_key()),
            active: target == active,
        })
        .collect();

    let (menu, content) = match active {
        NavTarget::Profile => (Vec::new(), Content::Profile(render_profile(state))),
        NavTarget::Trending => (render_menu(state, None), Content::Trending(render_trending(state))),
        NavTarget::Favorites => (
            render_menu(state, None),
            Content::Favorites(render_favorites(state)),
        ),
        NavTarget::Home | NavTarget::ExternalApp => {
            let category = state.active_category();
            (
                render_menu(state, category),
                Content::Category(render_category(state, category)),
            )
        }
    };

    let player = state.now_playing().map(|entry| {
        let is_favorite = state.favorites().contains(&entry.id);
        PlayerView {
            id: entry.id.clone(),
            title: entry.title.clone(),
            src: entry.src.clone(),
            is_favorite,
            open_label: state.t("openPlayer"),
            favorite_label: if is_favorite {
                state.t("removeFavorite")
            } else {
                state.t("addFavorite")
            },
        }
    });

    MainView {
        nav,
        menu,
        player,
        content,
    }
}

fn render_menu(state: &AppState, active: Option<&str>) -> Vec<MenuItem> {
    state
        .catalog()
        .category_names()
        .map(|name| MenuItem {
            category: name.to_owned(),
            active: Some(name) == active,
        })
        .collect()
}

fn cards<'a>(state: &AppState, entries: impl IntoIterator<Item = &'a Entry>) -> Vec<Card> {
    let play_label = state.t("nowPlaying");
    entries
        .into_iter()
        .map(|entry| Card {
            id: entry.id.clone(),
            title: entry.title.clone(),
            thumb: entry.thumb.clone(),
            is_favorite: state.favorites().contains(&entry.id),
            play_label: play_label.clone(),
        })
        .collect()
}

fn grid(heading: Option<String>, cards: Vec<Card>, empty: String) -> GridView {
    let empty_message = cards.is_empty().then_some(empty);
    GridView {
        heading,
        cards,
        empty_message,
    }
}

fn render_category(state: &AppState, category: Option<&str>) -> GridView {
    let entries = category
        .and_then(|name| state.catalog().category(name))
        .unwrap_or_default();
    grid(None, cards(state, entries), state.t("noContent"))
}

fn render_trending(state: &AppState) -> GridView {
    let entries = state.catalog().category(TRENDING).unwrap_or_default();
    grid(
        Some(state.t("trendingTitle")),
        cards(state, entries),
        state.t("noContent"),
    )
}

fn render_favorites(state: &AppState) -> GridView {
    let entries = state.favorites().resolve(state.catalog());
    grid(
        Some(state.t("favoritesTitle")),
        cards(state, entries),
        state.t("noFavorites"),
    )
}

fn render_profile(state: &AppState) -> ProfileView {
    let prefs = state.preferences();
    let themes = Theme::ALL
        .iter()
        .map(|&theme| Choice {
            value: theme,
            label: state.t(theme.label_key()),
            selected: theme == prefs.theme,
        })
        .collect();
    let languages = LANGUAGES
        .iter()
        .map(|&(code, label_key)| Choice {
            value: code.to_owned(),
            label: state.t(label_key),
            selected: code == prefs.language,
        })
        .collect();

    ProfileView {
        title: state.t("profileTitle"),
        email: state.user().map(|u| u.email.clone()).unwrap_or_default(),
        settings_title: state.t("settingsTitle"),
        theme_label: state.t("themeLabel"),
        themes,
        language_label: state.t("languageLabel"),
        languages,
        reset_label: state.t("resetData"),
        logout_label: state.t("logout"),
        embed_label: state.t("externalContent"),
    }
}
