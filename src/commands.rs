//! Command types for the Elm-style architecture
//!
//! Commands are side effects the host performs after an update: redraws,
//! context menus, and helper operators the engine cannot run itself.

use crate::model::PanelId;

/// Host operators the engine may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Scroll the region while the pointer is held near its edge
    EdgePan,
}

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Request a redraw of the region
    Redraw,
    /// Show the host's context menu for a panel header
    OpenContextMenu { panel: PanelId },
    /// Start a host operator
    InvokeOperator(Operator),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands, collapsing trivial batches
    pub fn batch(mut cmds: Vec<Cmd>) -> Self {
        cmds.retain(|c| *c != Cmd::None);
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.pop().unwrap_or_default(),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Check if this command requires a redraw
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            // Menus draw themselves
            Cmd::OpenContextMenu { .. } => false,
            Cmd::InvokeOperator(_) => false,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_redraw()),
        }
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            other => vec![other],
        }
    }

    /// Whether this command, or any command in a batch, is `cmd`
    pub fn contains(&self, cmd: &Cmd) -> bool {
        match self {
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.contains(cmd)),
            other => other == cmd,
        }
    }
}
