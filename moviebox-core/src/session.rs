use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::form_urlencoded;

use crate::error::SessionError;
use crate::storage::{load_json, save_json, ScopedStore, SharedStore};

pub const AUTH_KEY: &str = "auth";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

impl User {
    /// Identity derived from the normalized email; safe to use inside storage keys.
    /// Percent-encoding keeps distinct emails distinct; dots are encoded too
    /// since `.` separates scope and key.
    pub fn from_email(email: &str) -> Self {
        let email = email.trim().to_lowercase();
        let id = form_urlencoded::byte_serialize(email.as_bytes())
            .collect::<String>()
            .replace('.', "%2E");
        Self { id, email }
    }
}

/// Persisted under [`AUTH_KEY`]. Never holds the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthRecord {
    user: User,
    signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }
}

/// Checks the login form. Runs before anything is persisted.
pub fn validate_credentials(email: &str, password: &str) -> Result<User, SessionError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SessionError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SessionError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(User::from_email(email))
}

pub struct SessionManager {
    store: SharedStore,
    session: Session,
}

impl SessionManager {
    /// Starts from the stored auth record, if one parses.
    pub fn restore(store: SharedStore) -> Self {
        let session = match load_json::<AuthRecord>(store.as_ref(), AUTH_KEY) {
            Some(record) => {
                info!(user = %record.user.id, since = %record.signed_in_at, "restored session");
                Session::Authenticated(record.user)
            }
            None => Session::Unauthenticated,
        };
        Self { store, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User, SessionError> {
        let user = validate_credentials(email, password)?;
        let record = AuthRecord {
            user: user.clone(),
            signed_in_at: Utc::now(),
        };
        if let Err(e) = save_json(self.store.as_ref(), AUTH_KEY, &record) {
            warn!(error = %e, "failed to persist auth record");
        }
        info!(user = %user.id, "signed in");
        self.session = Session::Authenticated(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(AUTH_KEY) {
            warn!(error = %e, "failed to remove auth record");
        }
        if let Some(user) = self.session.user() {
            info!(user = %user.id, "signed out");
        }
        self.session = Session::Unauthenticated;
    }

    /// External auth-state callback. The local auth record is left untouched.
    pub fn on_auth_state_changed(&mut self, user: Option<User>) {
        self.session = match user {
            Some(user) => Session::Authenticated(user),
            None => Session::Unauthenticated,
        };
    }

    /// Storage area for the signed-in user's preferences and favorites.
    pub fn user_store(&self) -> Option<SharedStore> {
        self.session.user().map(|user| {
            Arc::new(ScopedStore::new(format!("user-{}", user.id), self.store.clone()))
                as SharedStore
        })
    }
}
