pub mod catalog;
pub mod config;
pub mod error;
pub mod i18n;
pub mod loader;
pub mod notice;
pub mod prefs;
pub mod session;
pub mod state;
pub mod storage;
pub mod view;

pub use catalog::{Catalog, CatalogDocument, Category, Entry};
pub use config::AppConfig;
pub use error::{CatalogError, SessionError, StoreError};
pub use i18n::Translations;
pub use loader::{load, spawn_load, CatalogSource, LoadOutcome, LoaderConfig};
pub use notice::{Notice, NoticeKind};
pub use prefs::{Favorites, PreferenceStore, Preferences, Theme};
pub use session::{Session, SessionManager, User};
pub use state::{AppState, Effect, NavTarget, StateSettings};
pub use storage::{FileStore, KeyValueStore, MemoryStore, ScopedStore, SharedStore};
pub use view::{render, View};
