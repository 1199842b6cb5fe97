//! Layout configuration persistence
//!
//! Stores user preferences in `~/.config/panelstack/config.yaml`. Every
//! field has a default, so partial files are fine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable layout constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Height of a panel header
    pub header_height: i32,
    /// Size of one header icon
    pub icon_size: f32,
    /// Horizontal margin reserved for the category tab strip
    pub category_margin: i32,
    /// Margin around box-style panels
    pub box_margin: i32,
    /// Smallest size a resize can produce
    pub min_width: i32,
    pub min_height: i32,
    /// Width reported for a region without panels
    pub default_width: i32,
    /// Duration of an open/close or drop animation, in milliseconds
    pub animation_ms: u64,
    /// Interval of the drag and animation timer, in milliseconds
    pub timer_interval_ms: u64,
    /// Interpolation factor used to reflow other panels while dragging
    pub drag_align_factor: f32,
    /// Key that toggles the panel under the pointer
    pub collapse_key: char,
    /// Theme id (file stem under `themes/`, or an embedded theme)
    pub theme: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            header_height: 20,
            icon_size: 20.0,
            category_margin: 20,
            box_margin: 4,
            min_width: 100,
            min_height: 70,
            default_width: 340,
            animation_ms: 300,
            timer_interval_ms: 20,
            drag_align_factor: 0.2,
            collapse_key: 'a',
            theme: "default-dark".to_string(),
        }
    }
}

impl PanelConfig {
    pub fn animation_time(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer_interval_ms)
    }

    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: PanelConfig = serde_yaml::from_str("header_height: 26\n").unwrap();
        assert_eq!(config.header_height, 26);
        assert_eq!(config.min_height, 70);
        assert_eq!(config.collapse_key, 'a');
    }

    #[test]
    fn test_durations() {
        let config = PanelConfig::default();
        assert_eq!(config.animation_time(), Duration::from_millis(300));
        assert_eq!(config.timer_interval(), Duration::from_millis(20));
    }
}
