use rokuconfig::{Config, ConfigError, find_config_file};
use std::fs;

#[test]
fn test_local_file_is_preferred_over_system_file() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("roku_bridge.conf");
    let system = dir.path().join("etc_roku_bridge.conf");
    fs::write(&local, "apps: Netflix\n").unwrap();
    fs::write(&system, "apps: Hulu\n").unwrap();

    let found = find_config_file(None, &local, &system).unwrap();
    assert_eq!(found, local);
}

#[test]
fn test_system_file_is_used_when_local_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("missing.conf");
    let system = dir.path().join("etc_roku_bridge.conf");
    fs::write(&system, "apps: Hulu\n").unwrap();

    let found = find_config_file(None, &local, &system).unwrap();
    assert_eq!(found, system);
}

#[test]
fn test_explicit_path_wins_when_it_exists() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("custom.conf");
    let local = dir.path().join("roku_bridge.conf");
    fs::write(&explicit, "apps: A\n").unwrap();
    fs::write(&local, "apps: B\n").unwrap();

    let found = find_config_file(Some(explicit.clone()), &local, dir.path().join("none").as_path()).unwrap();
    assert_eq!(found, explicit);
}

#[test]
fn test_missing_everywhere_names_both_locations() {
    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("a.conf");
    let system = dir.path().join("b.conf");

    let err = find_config_file(None, &local, &system).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }));
    let message = err.to_string();
    assert!(message.contains(&local.display().to_string()));
    assert!(message.contains(&system.display().to_string()));
}

#[test]
fn test_load_ini_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roku_bridge.conf");
    fs::write(&path, "apps = Netflix Hulu YouTube\nmqtt_broker = 192.168.1.10\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.get_apps().unwrap(), "Netflix Hulu YouTube");
    assert_eq!(config.get_mqtt_broker().unwrap(), "192.168.1.10");
    assert_eq!(config.get_http_port(), 8060);
}

#[test]
fn test_load_flat_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roku_bridge.conf");
    fs::write(&path, "apps: Netflix Hulu YouTube\nmqtt_broker: 192.168.1.10\n").unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.path(), path.as_path());
    assert_eq!(config.get_apps().unwrap(), "Netflix Hulu YouTube");
    assert_eq!(config.get_mqtt_broker().unwrap(), "192.168.1.10");
    assert_eq!(config.get_http_port(), 8060);
}

#[test]
fn test_invalid_yaml_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.conf");
    fs::write(&path, "apps: [Netflix\n").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.conf"));
}

#[test]
fn test_plain_text_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.conf");
    fs::write(&path, "Netflix Hulu YouTube\n").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Format { .. }));
    assert!(err.to_string().contains("notes.conf"));
}

#[test]
fn test_unreadable_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_path(&dir.path().join("nope.conf")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
