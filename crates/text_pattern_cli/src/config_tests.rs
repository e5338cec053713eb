use super::*;
use tempfile::TempDir;

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();

    assert_eq!(config.log_filter, "warn");
    assert_eq!(config.reservation.persistence_path, None);
    assert_eq!(config.reservation.random_max_attempts, 100);
}

#[test]
fn test_app_config_load_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("text-pattern.toml");
    fs::write(
        &config_path,
        "[reservation]\npersistence_path = \"values.json\"\n",
    )
    .expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.log_filter, "warn");
    assert_eq!(
        config.reservation.persistence_path,
        Some(PathBuf::from("values.json"))
    );
    assert_eq!(config.reservation.channel_capacity, 64);
}

#[test]
fn test_app_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");
    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = AppConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let result = AppConfig::load(Path::new("nonexistent_config.toml"));

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let result = AppConfig::load_or_default(Some(Path::new("does/not/exist.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_app_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("text-pattern.toml");

    let original = AppConfig {
        log_filter: "text_pattern=debug".to_string(),
        reservation: StoreConfig {
            persistence_path: Some(PathBuf::from("state.json")),
            random_max_attempts: 5,
            channel_capacity: 8,
            random_seed: Some(1),
        },
    };

    original.save(&config_path).expect("Failed to save config");
    let loaded = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(loaded, original);
}
