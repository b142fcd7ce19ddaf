use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, ok};
use serial_test::serial;

#[test]
#[serial]
fn given_empty_config_dir_when_load_then_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.database.path, "readings.db");
    assert_eq!(config.websocket.max_connections_per_key, 0);
    assert!(config.auth.api_key.is_none());
    assert!(config.auth.ws_api_key.is_none());
}

#[test]
#[serial]
fn given_toml_file_when_load_then_values_applied() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
[server]
host = "0.0.0.0"
port = 9000

[auth]
api_key = "ingest-secret"
ws_api_key = "stream-secret"

[websocket]
max_connections_per_key = 3
"#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.auth.api_key.as_deref(), Some("ingest-secret"));
    assert_eq!(config.auth.ws_api_key.as_deref(), Some("stream-secret"));
    assert_eq!(config.websocket.max_connections_per_key, 3);
}

#[test]
#[serial]
fn given_env_overrides_when_load_then_env_wins() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[server]\nport = 9000\n",
    )
    .unwrap();
    let _port = EnvGuard::set("SR_SERVER_PORT", "9100");
    let _key = EnvGuard::set("SR_WS_API_KEY", "env-stream-secret");
    let _quota = EnvGuard::set("SR_WS_MAX_CONNECTIONS_PER_KEY", "7");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.auth.ws_api_key.as_deref(), Some("env-stream-secret"));
    assert_eq!(config.websocket.max_connections_per_key, 7);
}

#[test]
#[serial]
fn given_defaults_when_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_absolute_database_path_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _path = EnvGuard::set("SR_DATABASE_PATH", "/etc/readings.db");

    // When
    let config = Config::load().unwrap();

    // Then
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn given_traversal_database_path_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _path = EnvGuard::set("SR_DATABASE_PATH", "../readings.db");

    // When
    let config = Config::load().unwrap();

    // Then
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn given_config_dir_env_when_database_path_then_joined() {
    // Given
    let (temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let path = config.database_path().unwrap();

    // Then
    assert_eq!(path, temp.path().join("readings.db"));
}
