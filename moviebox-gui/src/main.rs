mod app;

use std::sync::Arc;
use std::time::Duration;

use eframe::{egui, NativeOptions};
use moviebox_core::{spawn_load, AppConfig, AppState, FileStore, SharedStore, StateSettings};
use reqwest::{redirect, ClientBuilder};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{AppInit, MovieApp};

fn main() -> eframe::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let config = AppConfig::load();
    let client = ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .timeout(Duration::from_secs(config.catalog.request_timeout_seconds.max(1)))
        .user_agent("MovieBox/0.1")
        .build()
        .expect("failed to build HTTP client");

    let store = open_store();
    let (catalog_tx, catalog_rx) = mpsc::channel(1);
    let loader = {
        let _guard = runtime.enter();
        spawn_load(client, config.loader_config(), catalog_tx)
    };

    let size = [config.ui.window_width, config.ui.window_height];
    let init = AppInit {
        runtime: runtime.clone(),
        state: AppState::new(store, StateSettings::from(config)),
        catalog_rx,
        loader,
    };

    eframe::run_native(
        "MovieBox",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(size)
                .with_min_inner_size([480.0, 500.0]),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(MovieApp::new(init))),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn open_store() -> SharedStore {
    // Linux: ~/.config/moviebox/data
    let dir = FileStore::default_dir().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to the working directory for app data");
        std::env::current_dir()
            .unwrap_or_else(|_| std::env::temp_dir())
            .join("moviebox-data")
    });
    info!(path = %dir.display(), "app data directory");
    Arc::new(FileStore::open(dir))
}
