use std::fs;
use std::path::PathBuf;

use kartographer::config::{ConfigError, Settings, load_settings};
use tempfile::tempdir;

fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn defaults_match_the_engine_constants() {
    let settings = Settings::default();
    assert_eq!(settings.planner.default_increment_index, 2);
    assert_eq!(settings.planner.new_node_lead_s, 600.0);
    assert_eq!(settings.planner.granularity_index, 1);
    assert_eq!(settings.warp.overshoot_margin_s, 1.0);
    assert_eq!(settings.warp.soi_lead_s, 10.0);
    assert_eq!(settings.warp.transition_lead_s, 60.0);
    assert_eq!(settings.logging.filter, "info");
    assert!(settings.validate().is_ok());
}

#[test]
fn bundled_settings_are_the_defaults() {
    let settings = load_settings(repo_path("configs/settings.toml")).expect("bundled settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn partial_yaml_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.yaml");
    fs::write(&path, "warp:\n  overshoot_margin_s: 2.5\nlogging:\n  filter: debug\n").unwrap();

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.warp.overshoot_margin_s, 2.5);
    assert_eq!(settings.warp.soi_lead_s, 10.0);
    assert_eq!(settings.logging.filter, "debug");
    assert_eq!(settings.planner, Settings::default().planner);
}

#[test]
fn out_of_range_values_are_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "[warp]\nsoi_lead_s = -5.0\n").unwrap();
    match load_settings(&path) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "warp.soi_lead_s"),
        other => panic!("expected invalid field, got {other:?}"),
    }

    fs::write(&path, "[planner]\ndefault_increment_index = 6\n").unwrap();
    assert!(matches!(
        load_settings(&path),
        Err(ConfigError::Invalid {
            field: "planner.default_increment_index",
            ..
        })
    ));
}

#[test]
fn parse_and_io_failures_are_distinguished() {
    let dir = tempdir().unwrap();
    let toml_path = dir.path().join("broken.toml");
    fs::write(&toml_path, "[warp\n").unwrap();
    assert!(matches!(load_settings(&toml_path), Err(ConfigError::Toml(_))));

    let yaml_path = dir.path().join("broken.yaml");
    fs::write(&yaml_path, "warp: [1, 2").unwrap();
    assert!(matches!(load_settings(&yaml_path), Err(ConfigError::Parse(_))));

    assert!(matches!(
        load_settings(dir.path().join("missing.yaml")),
        Err(ConfigError::Io(_))
    ));
}
