//! Category tabs and the per-region active category stack

use serde::{Deserialize, Serialize};

use super::geometry::IRect;
use super::panel_type::PanelTypeRegistry;

/// One tab per distinct category seen among the region's panel types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub idname: String,
    /// Region-relative pixel rectangle, recomputed every draw
    pub rect: IRect,
}

impl CategoryTab {
    pub fn new(idname: impl Into<String>) -> Self {
        Self {
            idname: idname.into(),
            rect: IRect::default(),
        }
    }
}

/// Active category history, most recently chosen first
///
/// Fallback entries (chosen automatically rather than by the user) go to the
/// tail so a later explicit choice still wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveCategoryStack {
    entries: Vec<String>,
}

impl ActiveCategoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, idname: &str) -> bool {
        self.entries.iter().any(|e| e == idname)
    }

    /// Record `idname` as active
    ///
    /// Entries behind the new one whose category no registered type uses
    /// any more are dropped.
    pub fn set(&mut self, idname: &str, fallback: bool, types: &PanelTypeRegistry) {
        self.entries.retain(|e| e != idname);
        let pos = if fallback {
            self.entries.push(idname.to_string());
            self.entries.len() - 1
        } else {
            self.entries.insert(0, idname.to_string());
            0
        };

        let mut i = pos + 1;
        while i < self.entries.len() {
            if types.has_category(&self.entries[i]) {
                i += 1;
            } else {
                tracing::debug!(category = %self.entries[i], "pruning stale active category");
                self.entries.remove(i);
            }
        }
    }

    /// Add `idname` as a fallback unless it is already known
    pub fn set_default(&mut self, idname: &str, types: &PanelTypeRegistry) {
        if !self.contains(idname) {
            self.set(idname, true, types);
        }
    }

    /// First stacked entry that still has a tab
    pub fn first_present<'a>(&'a self, tabs: &[CategoryTab]) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|e| tabs.iter().any(|t| &t.idname == *e))
            .map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
