//! panelstack - Elm-style panel layout engine
//!
//! This crate manages a region's stack of collapsible, draggable panels:
//! layout passes, animated realignment, category tabs and input routing.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod persist;
pub mod replay;
pub mod theme;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::PanelConfig;
pub use messages::Msg;
pub use model::{Region, RegionContext};
pub use theme::Theme;
pub use update::update;
