use std::fs;

use statmon::core::config::Config;
use statmon::core::settings::Settings;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.interval_secs, 5);
    assert_eq!(config.semi_interval_mins, 10);
    assert_eq!(config.speedtest_every, 4);
    assert!(!config.background_collectors);
}

#[test]
fn test_config_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "interval_secs": 30, "wifi_interface": "wlp2s0", "outbreak_regions": ["Italy"] }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.interval_secs, 30);
    assert_eq!(config.wifi_interface, "wlp2s0");
    assert_eq!(config.outbreak_regions, vec!["Italy".to_string()]);
    assert_eq!(config.semi_interval_mins, 10);
}

#[test]
fn test_config_out_of_range_values_fall_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "interval_secs": 120, "semi_interval_mins": 0, "speedtest_every": 3 }"#,
    )
    .unwrap();

    let settings = Config::load_from(&path).unwrap().settings();

    assert_eq!(
        settings,
        Settings {
            speedtest_every: 3,
            ..Settings::default()
        }
    );
}

#[test]
fn test_config_malformed_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_empty_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "  \n").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_is_never_written() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("statmon").join("config.json");

    Config::load_from(&path).unwrap();

    assert!(!path.exists());
}
