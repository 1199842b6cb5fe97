//! Configuration system tests
//!
//! Tests for config paths and layout config loading/saving.

use panelstack::config::PanelConfig;
use panelstack::config_paths;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("panelstack"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_themes_and_logs_are_subdirs_of_config() {
    let (Some(config), Some(themes), Some(logs)) = (
        config_paths::config_dir(),
        config_paths::themes_dir(),
        config_paths::logs_dir(),
    ) else {
        return;
    };
    assert!(themes.starts_with(&config));
    assert!(logs.starts_with(&config));
}

// ========================================================================
// Panel Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = PanelConfig::default();
    assert_eq!(config.header_height, 20);
    assert_eq!(config.collapse_key, 'a');
    assert_eq!(config.theme, "default-dark");
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = PanelConfig {
        header_height: 26,
        animation_ms: 150,
        collapse_key: 'z',
        theme: "default-light".to_string(),
        ..PanelConfig::default()
    };
    config.save_to(&path).unwrap();

    assert_eq!(PanelConfig::load_from(&path), config);
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = PanelConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, PanelConfig::default());
}

#[test]
fn test_load_invalid_yaml_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "header_height: [not, a, number]\n").unwrap();

    assert_eq!(PanelConfig::load_from(&path), PanelConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "box_margin: 8\ndrag_align_factor: 0.5\n").unwrap();

    let config = PanelConfig::load_from(&path);
    assert_eq!(config.box_margin, 8);
    assert_eq!(config.drag_align_factor, 0.5);
    assert_eq!(config.min_width, 100);
}
