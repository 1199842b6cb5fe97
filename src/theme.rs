//! Theme system for panel chrome
//!
//! Provides YAML-based theming support with compile-time embedded themes
//! and user-defined themes from config directories.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/panelstack/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary

use std::path::Path;

use serde::Deserialize;

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark")
    pub id: &'static str,
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
];

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::info!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return a new color with the specified alpha value
    pub const fn with_alpha(&self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Scale the RGB channels, keeping alpha
    pub fn scaled(&self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Lighten (positive) or darken (negative) by a fixed amount per channel
    pub fn shade(&self, amount: i16) -> Self {
        let shift = |c: u8| (c as i16 + amount).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            a: self.a,
        }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.to_string());
        match s.len() {
            6 => Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Color roles the renderer asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeRole {
    Back,
    Text,
    TextHighlight,
    PanelHeader,
    PanelBack,
    PanelSubBack,
    Title,
    SearchMatch,
    BoxOutline,
    TabBack,
    TabActive,
    TabInactive,
    TabOutline,
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub ui: UiThemeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiThemeData {
    pub region: RegionThemeData,
    pub panel: PanelThemeData,
    pub tabs: TabThemeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionThemeData {
    pub background: String,
    pub text: String,
    pub text_highlight: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelThemeData {
    pub header: String,
    pub background: String,
    #[serde(default)]
    pub sub_background: Option<String>,
    pub title: String,
    pub search_match: String,
    #[serde(default)]
    pub box_outline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TabThemeData {
    pub background: String,
    pub active: String,
    pub inactive: String,
    pub outline: String,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub back: Color,
    pub text: Color,
    pub text_highlight: Color,
    pub panel_header: Color,
    pub panel_back: Color,
    pub panel_sub_back: Color,
    pub title: Color,
    pub search_match: Color,
    pub box_outline: Color,
    pub tab_back: Color,
    pub tab_active: Color,
    pub tab_inactive: Color,
    pub tab_outline: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // The embedded default theme is covered by tests
        Theme::from_yaml(DEFAULT_DARK_YAML).unwrap_or_else(|_| Theme::fallback())
    }
}

impl Theme {
    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let ui = data.ui;
        let panel_back = Color::from_hex(&ui.panel.background)?;
        Ok(Theme {
            name: data.name,
            back: Color::from_hex(&ui.region.background)?,
            text: Color::from_hex(&ui.region.text)?,
            text_highlight: Color::from_hex(&ui.region.text_highlight)?,
            panel_header: Color::from_hex(&ui.panel.header)?,
            panel_back,
            panel_sub_back: ui
                .panel
                .sub_background
                .as_deref()
                .map(Color::from_hex)
                .transpose()?
                .unwrap_or(panel_back),
            title: Color::from_hex(&ui.panel.title)?,
            search_match: Color::from_hex(&ui.panel.search_match)?,
            box_outline: ui
                .panel
                .box_outline
                .as_deref()
                .map(Color::from_hex)
                .transpose()?
                .unwrap_or_else(|| panel_back.shade(-24)),
            tab_back: Color::from_hex(&ui.tabs.background)?,
            tab_active: Color::from_hex(&ui.tabs.active)?,
            tab_inactive: Color::from_hex(&ui.tabs.inactive)?,
            tab_outline: Color::from_hex(&ui.tabs.outline)?,
        })
    }

    /// Hard-coded colors used if the embedded theme ever fails to parse
    fn fallback() -> Self {
        Theme {
            name: "Fallback".to_string(),
            back: Color::rgb(0x30, 0x30, 0x30),
            text: Color::rgb(0xC3, 0xC3, 0xC3),
            text_highlight: Color::rgb(0xFF, 0xFF, 0xFF),
            panel_header: Color::rgb(0x3D, 0x3D, 0x3D),
            panel_back: Color::rgb(0x33, 0x33, 0x33),
            panel_sub_back: Color::rgb(0x3A, 0x3A, 0x3A),
            title: Color::rgb(0xDD, 0xDD, 0xDD),
            search_match: Color::rgb(0x47, 0x72, 0xB3),
            box_outline: Color::rgb(0x2A, 0x2A, 0x2A),
            tab_back: Color::rgb(0x1D, 0x1D, 0x1D),
            tab_active: Color::rgb(0x30, 0x30, 0x30),
            tab_inactive: Color::rgb(0x23, 0x23, 0x23),
            tab_outline: Color::rgb(0x24, 0x24, 0x24),
        }
    }

    pub fn color(&self, role: ThemeRole) -> Color {
        match role {
            ThemeRole::Back => self.back,
            ThemeRole::Text => self.text,
            ThemeRole::TextHighlight => self.text_highlight,
            ThemeRole::PanelHeader => self.panel_header,
            ThemeRole::PanelBack => self.panel_back,
            ThemeRole::PanelSubBack => self.panel_sub_back,
            ThemeRole::Title => self.title,
            ThemeRole::SearchMatch => self.search_match,
            ThemeRole::BoxOutline => self.box_outline,
            ThemeRole::TabBack => self.tab_back,
            ThemeRole::TabActive => self.tab_active,
            ThemeRole::TabInactive => self.tab_inactive,
            ThemeRole::TabOutline => self.tab_outline,
        }
    }
}
