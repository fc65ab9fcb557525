use std::time::Duration;

use moviebox_core::{load, spawn_load, CatalogError, CatalogSource, LoaderConfig};
use reqwest::Client;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_document() -> String {
    r#"{
  "videos": {
    "trending": [
      { "id": "t1", "title": "Top Pick", "thumb": "http://img/t1.jpg", "src": "http://play/t1" }
    ],
    "action": [
      { "title": "Fast Run", "thumb": "http://img/a1.jpg", "src": "http://play/a1" },
      { "title": "Hard Hit", "thumb": "http://img/a2.jpg", "src": "http://play/a2" }
    ],
    "drama": [
      { "id": 42, "title": "Long Night", "thumb": "http://img/d1.jpg", "src": "http://play/d1" }
    ]
  },
  "translations": {
    "english": { "noContent": "Nothing here" },
    "myanmar": { "noContent": "မရှိပါ" }
  }
}"#
    .to_string()
}

fn config_for(server: &MockServer, route: &str) -> LoaderConfig {
    LoaderConfig {
        source: CatalogSource::Url(format!("{}{}", server.uri(), route)),
        translations_source: None,
        request_timeout: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn load_keeps_category_order_and_assigns_missing_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos_photos.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(sample_document()),
        )
        .mount(&server)
        .await;

    let outcome = load(&Client::new(), &config_for(&server, "/videos_photos.json")).await;
    assert!(outcome.error.is_none());

    let names: Vec<&str> = outcome.catalog.category_names().collect();
    assert_eq!(names, vec!["trending", "action", "drama"]);

    let action = outcome.catalog.category("action").unwrap();
    assert_eq!(action[0].id, "v1");
    assert_eq!(action[1].id, "v2");
    assert_eq!(outcome.catalog.find("t1").unwrap().title, "Top Pick");
    assert_eq!(outcome.catalog.find("42").unwrap().title, "Long Night");
    assert_eq!(outcome.translations.text("english", "noContent"), "Nothing here");
}

#[tokio::test]
async fn http_error_falls_back_to_empty_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos_photos.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = load(&Client::new(), &config_for(&server, "/videos_photos.json")).await;
    assert!(matches!(outcome.error, Some(CatalogError::Status(_))));
    assert!(outcome.catalog.is_empty());
    assert_eq!(outcome.translations.text("myanmar", "Error"), "Error");
}

#[tokio::test]
async fn invalid_json_falls_back_to_empty_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos_photos.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let outcome = load(&Client::new(), &config_for(&server, "/videos_photos.json")).await;
    assert!(matches!(outcome.error, Some(CatalogError::Parse(_))));
    assert!(outcome.catalog.is_empty());
}

#[tokio::test]
async fn translations_can_come_from_a_second_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "videos": { "action": [ { "title": "A" } ] } }"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/strings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "translations": { "english": { "navHome": "Start" } } }"#,
        ))
        .mount(&server)
        .await;

    let mut cfg = config_for(&server, "/videos.json");
    cfg.translations_source = Some(CatalogSource::Url(format!("{}/strings.json", server.uri())));
    let outcome = load(&Client::new(), &cfg).await;

    assert!(outcome.error.is_none());
    assert_eq!(outcome.catalog.entries().count(), 1);
    assert_eq!(outcome.translations.text("english", "navHome"), "Start");
}

#[tokio::test]
async fn file_source_is_read_from_disk() {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "moviebox_loader_{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let file = dir.join("videos_photos.json");
    tokio::fs::write(&file, sample_document()).await.unwrap();

    let cfg = LoaderConfig {
        source: CatalogSource::parse(file.to_str().unwrap()),
        ..LoaderConfig::default()
    };
    let outcome = load(&Client::new(), &cfg).await;
    assert!(outcome.error.is_none());
    assert_eq!(outcome.catalog.entries().count(), 4);

    let missing = LoaderConfig {
        source: CatalogSource::File(dir.join("absent.json")),
        ..LoaderConfig::default()
    };
    let outcome = load(&Client::new(), &missing).await;
    assert!(matches!(outcome.error, Some(CatalogError::Io(_))));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn slow_source_times_out_to_empty_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sample_document())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let cfg = LoaderConfig {
        request_timeout: Duration::from_millis(200),
        ..config_for(&server, "/slow.json")
    };
    let outcome = load(&Client::new(), &cfg).await;
    match outcome.error {
        Some(CatalogError::Network(e)) => assert!(e.is_timeout(), "unexpected error: {e}"),
        other => panic!("expected a network timeout, got {other:?}"),
    }
    assert!(outcome.catalog.is_empty());
}

#[tokio::test]
async fn spawned_load_delivers_outcome_over_channel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos_photos.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_document()))
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::channel(1);
    let handle = spawn_load(Client::new(), config_for(&server, "/videos_photos.json"), tx);

    let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("loader did not report in time")
        .expect("channel closed without an outcome");
    assert!(outcome.error.is_none());
    assert_eq!(outcome.catalog.entries().count(), 4);

    handle.await.unwrap();
    assert!(rx.recv().await.is_none());
}
