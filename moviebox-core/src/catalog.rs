use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::i18n::Translations;

pub const TRENDING: &str = "trending";
pub const DEFAULT_CATEGORY: &str = "action";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Entry {
    #[serde(default, deserialize_with = "id_from_value")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(default)]
    pub src: String,
}

// Source documents sometimes carry numeric ids.
fn id_from_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub entries: Vec<Entry>,
}

/// Categories in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|c| c.entries.is_empty())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn category(&self, name: &str) -> Option<&[Entry]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.entries.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.categories.iter().flat_map(|c| c.entries.iter())
    }

    /// First entry carrying `id`, searching categories in order.
    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.entries().find(|entry| entry.id == id)
    }

    /// Home grid selection: `action` when present, else the first category.
    pub fn default_category(&self) -> Option<&str> {
        if self.category(DEFAULT_CATEGORY).is_some() {
            Some(DEFAULT_CATEGORY)
        } else {
            self.category_names().next()
        }
    }

    /// Fills missing ids with `v1`, `v2`, ... counted across the whole catalog.
    /// Counter values already taken by source ids are skipped.
    pub fn assign_ids(&mut self) {
        let taken: HashSet<String> = self
            .entries()
            .filter(|e| !e.id.is_empty())
            .map(|e| e.id.clone())
            .collect();
        let mut counter: u64 = 1;
        let mut assigned = 0usize;
        for category in &mut self.categories {
            for entry in &mut category.entries {
                if !entry.id.is_empty() {
                    continue;
                }
                let mut candidate = format!("v{counter}");
                while taken.contains(&candidate) {
                    counter += 1;
                    candidate = format!("v{counter}");
                }
                counter += 1;
                entry.id = candidate;
                assigned += 1;
            }
        }
        debug!(assigned, "assigned catalog ids");
    }
}

/// `{ videos: { [category]: Entry[] }, translations: { [lang]: { [key]: string } } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    videos: serde_json::Map<String, Value>,
    #[serde(default)]
    pub translations: Translations,
}

impl CatalogDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Builds the catalog keeping category order from the document.
    pub fn catalog(&self) -> Catalog {
        let categories = self
            .videos
            .iter()
            .map(|(name, value)| {
                let entries = match serde_json::from_value::<Vec<Entry>>(value.clone()) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(error = %e, category = %name, "skipping malformed category");
                        Vec::new()
                    }
                };
                Category {
                    name: name.clone(),
                    entries,
                }
            })
            .collect();
        Catalog::new(categories)
    }
}
