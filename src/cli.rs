//! Command-line argument parsing and replay scenarios
//!
//! The `panelstack` binary replays a YAML scenario against a region:
//! panel types are registered, then each step runs a layout pass, feeds an
//! input event or advances the clock. The resulting layout is printed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::config::PanelConfig;
use crate::messages::{InputEvent, KeyCode, Modifiers, MouseButton, WheelDirection};
use crate::model::{
    IRect, Panel, PanelType, PanelTypeFlags, PanelTypeRegistry, Point, Region, RegionAlignment,
};
use crate::update::ContentBuilder;

/// Replay panel layout scenarios
#[derive(Parser, Debug)]
#[command(name = "panelstack", version, about = "Replay panel layout scenarios")]
pub struct CliArgs {
    /// Scenario file to replay
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Config file (defaults to the user config)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Restore panel state from this file before the first step
    #[arg(long, value_name = "PATH")]
    pub restore_state: Option<PathBuf>,

    /// Save panel state to this file after the last step
    #[arg(long, value_name = "PATH")]
    pub save_state: Option<PathBuf>,

    /// Also print the draw calls of the final layout
    #[arg(long)]
    pub draw: bool,

    /// Print the final layout as JSON
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    pub fn load_config(&self) -> PanelConfig {
        match &self.config {
            Some(path) => PanelConfig::load_from(path),
            None => PanelConfig::load(),
        }
    }
}

// ============================================================================
// Scenario format
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonName {
    #[default]
    Left,
    Right,
    Middle,
}

impl From<ButtonName> for MouseButton {
    fn from(button: ButtonName) -> Self {
        match button {
            ButtonName::Left => MouseButton::Left,
            ButtonName::Right => MouseButton::Right,
            ButtonName::Middle => MouseButton::Middle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelName {
    Up,
    Down,
}

impl From<WheelName> for WheelDirection {
    fn from(direction: WheelName) -> Self {
        match direction {
            WheelName::Up => WheelDirection::Up,
            WheelName::Down => WheelDirection::Down,
        }
    }
}

/// Parse modifier names such as `ctrl` or `shift`
pub fn parse_modifiers(names: &[String]) -> Result<Modifiers, String> {
    names.iter().try_fold(Modifiers::NONE, |mods, name| {
        let m = match name.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Modifiers::CTRL,
            "shift" => Modifiers::SHIFT,
            "alt" => Modifiers::ALT,
            "meta" | "cmd" | "super" => Modifiers::META,
            other => return Err(format!("Unknown modifier: {}", other)),
        };
        Ok(mods | m)
    })
}

/// Parse a key name: a single character or `tab`, `return`, `enter`, `escape`
pub fn parse_key(name: &str) -> Result<KeyCode, String> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c.to_ascii_lowercase()));
    }
    match name.to_ascii_lowercase().as_str() {
        "tab" => Ok(KeyCode::Tab),
        "return" => Ok(KeyCode::Return),
        "enter" | "pad_enter" => Ok(KeyCode::PadEnter),
        "escape" | "esc" => Ok(KeyCode::Escape),
        other => Err(format!("Unknown key: {}", other)),
    }
}

/// One panel type of a scenario
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioPanelType {
    pub idname: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub context: String,
    /// Parent type idname; must be listed earlier
    #[serde(default)]
    pub parent: Option<String>,
    /// Content height the replay reports for this panel
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub no_header: bool,
    #[serde(default)]
    pub default_closed: bool,
    #[serde(default)]
    pub draw_box: bool,
    #[serde(default)]
    pub instanced: bool,
}

fn default_height() -> i32 {
    100
}

fn default_region_width() -> i32 {
    300
}

fn default_region_height() -> i32 {
    600
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioRegion {
    #[serde(default = "default_region_width")]
    pub width: i32,
    #[serde(default = "default_region_height")]
    pub height: i32,
    #[serde(default)]
    pub alignment: RegionAlignment,
}

impl Default for ScenarioRegion {
    fn default() -> Self {
        Self {
            width: default_region_width(),
            height: default_region_height(),
            alignment: RegionAlignment::None,
        }
    }
}

/// A step of a scenario
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Run a full layout pass
    Layout,
    Press {
        #[serde(default)]
        button: ButtonName,
        x: f32,
        y: f32,
        #[serde(default)]
        mods: Vec<String>,
    },
    Release {
        #[serde(default)]
        button: ButtonName,
        x: f32,
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    Key {
        key: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        mods: Vec<String>,
    },
    Wheel {
        direction: WheelName,
        x: f32,
        y: f32,
        #[serde(default)]
        mods: Vec<String>,
    },
    /// Advance the clock and fire due timers
    Tick {
        ms: u64,
    },
    /// Switch the active category
    Category(String),
    /// Replace the instanced list data
    Instances(Vec<String>),
    /// Start or clear a search; listed panel types match it
    Search(Vec<String>),
    ContentChanged,
}

impl Step {
    /// Input event for this step, if it is one
    pub fn to_event(&self) -> Result<Option<InputEvent>, String> {
        let event = match self {
            Step::Press { button, x, y, mods } => {
                InputEvent::press((*button).into(), Point::new(*x, *y))
                    .with_modifiers(parse_modifiers(mods)?)
            }
            Step::Release { button, x, y } => InputEvent::release((*button).into(), Point::new(*x, *y)),
            Step::Move { x, y } => InputEvent::pointer_move(Point::new(*x, *y)),
            Step::Key { key, x, y, mods } => {
                InputEvent::key(parse_key(key)?, Point::new(*x, *y)).with_modifiers(parse_modifiers(mods)?)
            }
            Step::Wheel { direction, x, y, mods } => {
                InputEvent::wheel((*direction).into(), Point::new(*x, *y))
                    .with_modifiers(parse_modifiers(mods)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// A replayable scenario
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub region: ScenarioRegion,
    /// Region context string; panel types with another context are hidden
    #[serde(default)]
    pub context: Option<String>,
    pub panel_types: Vec<ScenarioPanelType>,
    /// Steps are written as `- layout` or `- press: { x: 10, y: 20 }`
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse scenario: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
    }

    /// Register the scenario's panel types and create the region
    pub fn build_region(&self, config: PanelConfig) -> Result<Region, String> {
        let mut types = PanelTypeRegistry::new();
        for t in &self.panel_types {
            let mut panel_type = PanelType::new(&t.idname, if t.label.is_empty() { &t.idname } else { &t.label })
                .with_category(&t.category)
                .with_context(&t.context)
                .with_flags(PanelTypeFlags {
                    no_header: t.no_header,
                    default_closed: t.default_closed,
                    draw_box: t.draw_box,
                    instanced: t.instanced,
                });
            if let Some(parent) = &t.parent {
                let parent_id = types
                    .find(parent)
                    .ok_or_else(|| format!("Parent '{}' of '{}' must be listed first", parent, t.idname))?;
                panel_type = panel_type.with_parent(parent_id);
            }
            types.register(panel_type);
        }

        let win_rect = IRect::new(0, self.region.width, 0, self.region.height);
        let mut region = Region::new(types, config, win_rect).with_alignment(self.region.alignment);
        region.context = self.context.clone();
        Ok(region)
    }

    pub fn builder(&self) -> ScenarioBuilder {
        ScenarioBuilder {
            heights: self
                .panel_types
                .iter()
                .map(|t| (t.idname.clone(), t.height))
                .collect(),
            search_matches: Vec::new(),
        }
    }
}

/// Content builder reporting the fixed heights listed in a scenario
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    pub heights: HashMap<String, i32>,
    pub search_matches: Vec<String>,
}

impl ContentBuilder for ScenarioBuilder {
    fn build(&mut self, panel_type: &PanelType, _panel: &Panel, _width: i32) -> i32 {
        self.heights.get(&panel_type.idname).copied().unwrap_or(0)
    }

    fn matches_search(&mut self, panel_type: &PanelType, _panel: &Panel) -> bool {
        self.search_matches.contains(&panel_type.idname)
    }
}
