//! Saving and restoring panel state between sessions
//!
//! Panels are stored by type idname with their sort order, flags, and
//! geometry. Instanced panels are left out: they are rebuilt from the
//! host's list data, which also carries their packed expansion flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{ActiveCategoryStack, Panel, PanelId, Region, Snap};

/// Saved state of one panel and its sub-panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPanel {
    pub name: String,
    pub sort_order: i32,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub snap: Snap,
    pub ofs: (i32, i32),
    pub size: (i32, i32),
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SavedPanel>,
}

/// Everything about a region worth keeping across sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionState {
    pub panels: Vec<SavedPanel>,
    #[serde(default)]
    pub active_categories: ActiveCategoryStack,
}

fn save_panel(region: &Region, id: PanelId) -> SavedPanel {
    let panel = &region.panels[id];
    SavedPanel {
        name: panel.name.clone(),
        sort_order: panel.sort_order,
        closed: panel.flags.closed,
        pinned: panel.flags.pinned,
        snap: panel.snap,
        ofs: (panel.ofs_x, panel.ofs_y),
        size: (panel.size_x, panel.size_y),
        children: panel
            .children
            .iter()
            .map(|&child| save_panel(region, child))
            .collect(),
    }
}

fn restore_panel(region: &mut Region, parent: Option<PanelId>, saved: &SavedPanel) {
    let Some(type_id) = region.types.find(&saved.name) else {
        tracing::warn!(panel = %saved.name, "no registered type for saved panel, skipping");
        return;
    };
    let panel_type = &region.types[type_id];
    let parent_type = parent.and_then(|p| region.panels[p].type_id);
    if panel_type.flags.instanced || panel_type.parent != parent_type {
        tracing::warn!(panel = %saved.name, "saved panel does not fit the type hierarchy, skipping");
        return;
    }

    let id = match region.panels.find_by_name(parent, &saved.name) {
        Some(id) => id,
        None => region.panels.insert(Panel::new(type_id, saved.name.clone()), parent),
    };

    let panel = &mut region.panels[id];
    panel.sort_order = saved.sort_order;
    panel.flags.closed = saved.closed;
    panel.flags.pinned = saved.pinned;
    panel.snap = saved.snap;
    (panel.ofs_x, panel.ofs_y) = saved.ofs;
    (panel.size_x, panel.size_y) = saved.size;

    for child in &saved.children {
        restore_panel(region, Some(id), child);
    }
}

impl RegionState {
    /// Snapshot the persistent part of a region
    pub fn capture(region: &Region) -> Self {
        let panels = region
            .panels
            .roots()
            .iter()
            .copied()
            .filter(|&id| !region.panel_type(id).is_some_and(|t| t.flags.instanced))
            .map(|id| save_panel(region, id))
            .collect();
        Self {
            panels,
            active_categories: region.active_categories.clone(),
        }
    }

    /// Apply saved state to a region, creating panels that do not exist yet
    ///
    /// Panels whose type is no longer registered are skipped.
    pub fn apply(&self, region: &mut Region) {
        for saved in &self.panels {
            restore_panel(region, None, saved);
        }
        region.active_categories = self.active_categories.clone();
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize state: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse state: {}", e))
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml::to_string(self).map_err(|e| format!("Failed to serialize state: {}", e))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse state: {}", e))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Write the region's state to `path`, as JSON for `.json` files and YAML otherwise
pub fn save_state(region: &Region, path: &Path) -> Result<(), String> {
    let state = RegionState::capture(region);
    let content = if is_json(path) {
        state.to_json()?
    } else {
        state.to_yaml()?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create state directory: {}", e))?;
    }
    std::fs::write(path, content)
        .map_err(|e| format!("Failed to write state to {}: {}", path.display(), e))?;

    tracing::info!("Saved panel state to {}", path.display());
    Ok(())
}

/// Read state written by `save_state` and apply it to the region
pub fn restore_state(region: &mut Region, path: &Path) -> Result<(), String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read state from {}: {}", path.display(), e))?;
    let state = if is_json(path) {
        RegionState::from_json(&content)?
    } else {
        RegionState::from_yaml(&content)?
    };

    state.apply(region);
    tracing::info!("Restored panel state from {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::model::{IRect, PanelType, PanelTypeRegistry};

    fn types() -> PanelTypeRegistry {
        let mut types = PanelTypeRegistry::new();
        let a = types.register(PanelType::new("PT_a", "A"));
        types.register(PanelType::new("PT_a_sub", "Sub").with_parent(a));
        types.register(PanelType::new("PT_b", "B"));
        types.register(PanelType::new("MOD_PT_list", "List").instanced());
        types
    }

    fn region() -> Region {
        Region::new(types(), PanelConfig::default(), IRect::new(0, 300, 0, 600))
    }

    #[test]
    fn test_capture_skips_instanced_and_recurses() {
        let mut region = region();
        let a = region.types.find("PT_a").unwrap();
        let sub = region.types.find("PT_a_sub").unwrap();
        let list = region.types.find("MOD_PT_list").unwrap();

        let pa = region.panels.insert(Panel::new(a, "PT_a"), None);
        let ps = region.panels.insert(Panel::new(sub, "PT_a_sub"), Some(pa));
        region.panels.insert(Panel::new(list, "MOD_PT_list"), None);
        region.panels[ps].flags.closed = true;

        let state = RegionState::capture(&region);
        assert_eq!(state.panels.len(), 1);
        assert_eq!(state.panels[0].children.len(), 1);
        assert!(state.panels[0].children[0].closed);
    }

    #[test]
    fn test_apply_creates_missing_panels_and_skips_unknown() {
        let state = RegionState::from_yaml(
            r#"
panels:
  - name: PT_b
    sort_order: 0
    pinned: true
    snap: bottom
    ofs: [0, -120]
    size: [300, 100]
  - name: PT_gone
    sort_order: 1
    ofs: [0, 0]
    size: [0, 0]
active_categories: [View]
"#,
        )
        .unwrap();

        let mut region = region();
        state.apply(&mut region);

        assert_eq!(region.panels.roots().len(), 1);
        let id = region.panels.roots()[0];
        let panel = &region.panels[id];
        assert!(panel.flags.pinned);
        assert_eq!(panel.snap, Snap::Bottom);
        assert_eq!((panel.ofs_y, panel.size_y), (-120, 100));
        assert_eq!(region.active_categories.entries(), &["View".to_string()]);
    }

    #[test]
    fn test_save_and_restore_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("panels.json");

        let mut region = region();
        let b = region.types.find("PT_b").unwrap();
        let id = region.panels.insert(Panel::new(b, "PT_b"), None);
        region.panels[id].flags.closed = true;
        region.panels[id].sort_order = 3;
        save_state(&region, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with('{'));

        let mut restored = Region::new(types(), PanelConfig::default(), IRect::new(0, 300, 0, 600));
        restore_state(&mut restored, &path).unwrap();
        let id = restored.panels.roots()[0];
        assert!(restored.panels[id].flags.closed);
        assert_eq!(restored.panels[id].sort_order, 3);
    }

    #[test]
    fn test_restore_missing_file_errors() {
        let mut region = region();
        let err = restore_state(&mut region, Path::new("/nonexistent/panels.yaml")).unwrap_err();
        assert!(err.contains("Failed to read state"));
    }
}
