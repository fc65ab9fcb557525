use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use url::Url;

use crate::catalog::{Catalog, CatalogDocument};
use crate::error::CatalogError;
use crate::i18n::Translations;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// `http(s)://` locations are fetched, anything else is read from disk.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            CatalogSource::Url(location.to_owned())
        } else {
            CatalogSource::File(PathBuf::from(location))
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub source: CatalogSource,
    /// When set, translations come from this document instead of `source`.
    pub translations_source: Option<CatalogSource>,
    pub request_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::File(PathBuf::from("videos_photos.json")),
            translations_source: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub translations: Translations,
    /// Set when the fallback catalog was used.
    pub error: Option<CatalogError>,
}

impl LoadOutcome {
    fn fallback(error: CatalogError) -> Self {
        Self {
            catalog: Catalog::default(),
            translations: Translations::minimal(),
            error: Some(error),
        }
    }
}

pub async fn fetch_document(
    client: &Client,
    source: &CatalogSource,
    timeout: Duration,
) -> Result<CatalogDocument, CatalogError> {
    let bytes = match source {
        CatalogSource::Url(location) => {
            let url = Url::parse(location)?;
            let response = client.get(url).timeout(timeout).send().await?;
            if !response.status().is_success() {
                return Err(CatalogError::Status(response.status()));
            }
            response.bytes().await?.to_vec()
        }
        CatalogSource::File(path) => tokio::fs::read(path).await?,
    };
    Ok(CatalogDocument::from_slice(&bytes)?)
}

async fn try_load(client: &Client, config: &LoaderConfig) -> Result<LoadOutcome, CatalogError> {
    let document = fetch_document(client, &config.source, config.request_timeout).await?;
    let translations = match &config.translations_source {
        Some(source) => {
            fetch_document(client, source, config.request_timeout)
                .await?
                .translations
        }
        None => document.translations.clone(),
    };
    let mut catalog = document.catalog();
    catalog.assign_ids();
    Ok(LoadOutcome {
        catalog,
        translations,
        error: None,
    })
}

/// Loads the catalog, falling back to an empty one with minimal strings on any failure.
pub async fn load(client: &Client, config: &LoaderConfig) -> LoadOutcome {
    match try_load(client, config).await {
        Ok(outcome) => {
            info!(
                categories = outcome.catalog.categories().len(),
                entries = outcome.catalog.entries().count(),
                "catalog loaded"
            );
            outcome
        }
        Err(err) => {
            warn!(source = ?config.source, error = %err, "failed to load catalog, content will be empty");
            LoadOutcome::fallback(err)
        }
    }
}

/// Runs [`load`] on the current tokio runtime and sends the outcome on `tx`.
pub fn spawn_load(
    client: Client,
    config: LoaderConfig,
    tx: mpsc::Sender<LoadOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = load(&client, &config).await;
        if tx.send(outcome).await.is_err() {
            warn!("catalog receiver dropped");
        }
    })
}
