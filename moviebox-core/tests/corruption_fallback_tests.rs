use std::sync::Arc;

use moviebox_core::{FileStore, KeyValueStore, PreferenceStore, Preferences, SharedStore, Theme};

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "moviebox_{}_{}",
        tag,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn corrupt_settings_load_as_defaults() {
    let dir = temp_dir("corrupt_settings");
    std::fs::write(dir.join("userSettings.json"), b"{ this is not json ").unwrap();

    let store: SharedStore = Arc::new(FileStore::open(&dir));
    let prefs = PreferenceStore::new(store).load();
    assert_eq!(prefs, Preferences::default());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn wrongly_typed_records_load_as_defaults() {
    let dir = temp_dir("wrong_types");
    std::fs::write(dir.join("userSettings.json"), br#"{ "theme": "neon" }"#).unwrap();
    std::fs::write(dir.join("favorites.json"), br#"{ "v1": true }"#).unwrap();

    let prefs = PreferenceStore::new(Arc::new(FileStore::open(&dir)));
    assert_eq!(prefs.load(), Preferences::default());
    assert!(prefs.load_favorites().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn partial_settings_are_merged_over_defaults() {
    let dir = temp_dir("partial");
    std::fs::write(dir.join("userSettings.json"), br#"{ "theme": "light" }"#).unwrap();

    let prefs = PreferenceStore::new(Arc::new(FileStore::open(&dir))).load();
    assert_eq!(prefs.theme, Theme::Light);
    assert_eq!(prefs.language, "myanmar");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_file_uses_tmp_fallback() {
    let dir = temp_dir("tmp_fallback");
    std::fs::write(dir.join("favorites.json"), b"[\"v1\", ").unwrap();
    std::fs::write(dir.join("favorites.json.tmp"), br#"["v1","v2"]"#).unwrap();

    let prefs = PreferenceStore::new(Arc::new(FileStore::open(&dir)));
    assert_eq!(prefs.load_favorites().ids(), ["v1".to_string(), "v2".to_string()]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn file_store_writes_whole_documents_and_clears() {
    let dir = temp_dir("roundtrip");
    let store = FileStore::open(&dir);
    store.set("auth", r#"{"a":1}"#).unwrap();
    store.set("favorites", r#"["v1"]"#).unwrap();
    assert!(!dir.join("auth.json.tmp").exists());

    let reopened = FileStore::open(&dir);
    assert_eq!(reopened.get("auth").as_deref(), Some(r#"{"a":1}"#));
    let mut keys = reopened.keys();
    keys.sort();
    assert_eq!(keys, vec!["auth".to_string(), "favorites".to_string()]);

    reopened.clear().unwrap();
    assert!(reopened.keys().is_empty());
    assert!(reopened.get("auth").is_none());
    reopened.remove("auth").unwrap();

    let _ = std::fs::remove_dir_all(&dir);
}
