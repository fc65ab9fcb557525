use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Alert { message: String },
    /// External content shown in the modal until closed.
    Embed { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub kind: NoticeKind,
    pub opened_at: DateTime<Utc>,
}

impl Notice {
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: NoticeKind::Alert {
                message: message.into(),
            },
            opened_at: Utc::now(),
        }
    }

    pub fn embed(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: NoticeKind::Embed { url: url.into() },
            opened_at: Utc::now(),
        }
    }

    /// Alerts close on their own after `ttl`; embeds stay open.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self.kind {
            NoticeKind::Alert { .. } => {
                let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52));
                now.signed_duration_since(self.opened_at) >= ttl
            }
            NoticeKind::Embed { .. } => false,
        }
    }
}
