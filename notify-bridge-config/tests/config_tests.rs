//! Tests for configuration persistence and the session store.

use notify_bridge_config::{
    Config, ConfigError, LogLevel, PresenterKind, SessionStore, SessionUser, UserId,
};
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.endpoint, "wss://ai-credit-backend.onrender.com");
    assert_eq!(config.socket_path, "/socket.io/");
    assert_eq!(config.connect_timeout_secs, 20);
    assert_eq!(config.presenter, PresenterKind::Desktop);
    assert!(config.speech_enabled);
    assert!(config.speech_locale.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_yaml_fills_defaults() {
    let yaml = r#"
endpoint: "https://backend.example.com"
presenter: console
speech_enabled: false
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.endpoint, "https://backend.example.com");
    assert_eq!(config.presenter, PresenterKind::Console);
    assert!(!config.speech_enabled);
    assert_eq!(config.socket_path, "/socket.io/");
    assert_eq!(config.connect_timeout_secs, 20);
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let result = Config::from_yaml("presenter: [not, an, enum");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_save_and_load_roundtrip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("config.yaml");

    let config = Config {
        endpoint: "ws://localhost:8000".to_string(),
        user_refresh_command: Some("notify-send refresh".to_string()),
        log_level: LogLevel::Debug,
        ..Config::default()
    };
    config.save_to(&path).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("yaml.tmp").exists());

    let loaded = Config::load_from(&path).unwrap();
    // The endpoint override may be set in the environment running the tests.
    if std::env::var(notify_bridge_config::ENDPOINT_ENV_VAR).is_err() {
        assert_eq!(loaded, config);
    }
    assert_eq!(loaded.log_level, LogLevel::Debug);
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "socket_path: \"no-slashes\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(
        matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::Validation(_))),
        "unexpected error: {err:#}"
    );
}

#[test]
fn test_session_store_missing_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_session_store_save_load_clear() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("state").join("session.json"));

    let mut user = SessionUser::new(UserId::Number(5));
    user.email = Some("admin@example.com".to_string());
    store.save(&user).unwrap();

    assert_eq!(store.load().unwrap(), Some(user));

    store.clear().unwrap();
    assert!(store.load().unwrap().is_none());
    // Clearing twice is fine.
    store.clear().unwrap();
}

#[test]
fn test_session_store_corrupt_file_is_json_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = SessionStore::new(&path);
    assert!(matches!(store.load(), Err(ConfigError::Json(_))));
}

#[test]
fn test_session_store_empty_file_is_none() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("session.json");
    std::fs::write(&path, "\n").unwrap();

    assert!(SessionStore::new(&path).load().unwrap().is_none());
}
