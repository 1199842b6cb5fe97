//! Panel tree storage
//!
//! Panels live in an arena addressed by generational `PanelId`s. Sibling
//! order is kept in index lists: `roots` for top-level panels and
//! `Panel::children` for sub-panels. Deleting a panel bumps the slot's
//! generation, so stale ids held by handlers resolve to `None` instead of
//! aliasing a newer panel.

use super::panel::Panel;
use super::panel_type::PanelTypeRegistry;

/// Stable handle to a panel in a `PanelTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    panel: Option<Panel>,
}

/// External ordered data list that instanced panels mirror
pub trait ListData {
    fn count(&self) -> usize;
    /// Panel type idname that should represent the item at `index`
    fn identifier_at(&self, index: usize) -> &str;
}

impl<S: AsRef<str>> ListData for [S] {
    fn count(&self) -> usize {
        self.len()
    }

    fn identifier_at(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

impl<S: AsRef<str>> ListData for Vec<S> {
    fn count(&self) -> usize {
        self.len()
    }

    fn identifier_at(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PanelTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<PanelId>,
}

impl PanelTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.panel.as_ref())
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.panel.as_mut())
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live panels, sub-panels included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.panel.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Top-level panels in list order
    pub fn roots(&self) -> &[PanelId] {
        &self.roots
    }

    pub fn children(&self, id: PanelId) -> &[PanelId] {
        self.get(id).map(|p| p.children.as_slice()).unwrap_or(&[])
    }

    /// The sibling list a panel with this parent belongs to
    pub fn siblings(&self, parent: Option<PanelId>) -> &[PanelId] {
        match parent {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    fn siblings_mut(&mut self, parent: Option<PanelId>) -> &mut Vec<PanelId> {
        match parent {
            Some(parent) => &mut self[parent].children,
            None => &mut self.roots,
        }
    }

    /// Append a panel to the end of its sibling list
    pub fn insert(&mut self, mut panel: Panel, parent: Option<PanelId>) -> PanelId {
        panel.parent = parent;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.panel = Some(panel);
                PanelId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    panel: Some(panel),
                });
                PanelId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        self.siblings_mut(parent).push(id);
        id
    }

    /// Move `id` to directly after `after` within their shared sibling list
    pub fn move_after(&mut self, id: PanelId, after: PanelId) {
        if id == after {
            return;
        }
        let parent = self[id].parent;
        debug_assert_eq!(parent, self[after].parent, "panels must be siblings");
        let list = self.siblings_mut(parent);
        list.retain(|&p| p != id);
        let pos = list
            .iter()
            .position(|&p| p == after)
            .map_or(list.len(), |i| i + 1);
        list.insert(pos, id);
    }

    /// Find a panel by its type idname in one sibling list (non-recursive)
    pub fn find_by_name(&self, parent: Option<PanelId>, idname: &str) -> Option<PanelId> {
        self.siblings(parent)
            .iter()
            .copied()
            .find(|&id| self[id].name == idname)
    }

    /// Find an instanced top-level panel by idname and data index
    ///
    /// The data index is the panel's unique suffix, its sort order.
    pub fn find_instanced(&self, idname: &str, index: i32) -> Option<PanelId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self[id].name == idname && self[id].sort_order == index)
    }

    /// The panel and all descendants, depth first, parent before children
    pub fn subtree(&self, id: PanelId) -> Vec<PanelId> {
        let mut out = Vec::new();
        self.collect_subtree(id, &mut out);
        out
    }

    fn collect_subtree(&self, id: PanelId, out: &mut Vec<PanelId>) {
        out.push(id);
        for &child in self.children(id) {
            self.collect_subtree(child, out);
        }
    }

    /// Every live panel, top-level lists first in order, depth first
    pub fn all(&self) -> Vec<PanelId> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.collect_subtree(root, &mut out);
        }
        out
    }

    /// Remove a panel and all descendants, children before parent
    ///
    /// Returns the removed panels; dropping them releases any custom data
    /// they still hold.
    pub fn delete(&mut self, id: PanelId) -> Vec<Panel> {
        let Some(parent) = self.get(id).map(|p| p.parent) else {
            return Vec::new();
        };
        self.siblings_mut(parent).retain(|&p| p != id);

        let mut removed = Vec::new();
        self.delete_recursive(id, &mut removed);
        removed
    }

    fn delete_recursive(&mut self, id: PanelId, removed: &mut Vec<Panel>) {
        let children = std::mem::take(&mut self[id].children);
        for child in children {
            self.delete_recursive(child, removed);
        }

        let slot = &mut self.slots[id.index as usize];
        if let Some(panel) = slot.panel.take() {
            removed.push(panel);
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    /// Check that the instanced top-level panels mirror `data` one-to-one
    ///
    /// Returns false when the counts differ, an idname differs at any
    /// position, or a panel was reordered by drag-and-drop.
    pub fn matches_list_data(&self, types: &PanelTypeRegistry, data: Option<&dyn ListData>) -> bool {
        let data_len = data.map_or(0, |d| d.count());

        let mut i = 0;
        for &id in &self.roots {
            let panel = &self[id];
            let Some(type_id) = panel.type_id else {
                continue;
            };
            let panel_type = &types[type_id];
            if !panel_type.flags.instanced {
                continue;
            }

            if panel.flags.list_order_changed {
                return false;
            }
            let Some(data) = data.filter(|_| i < data_len) else {
                return false;
            };
            if data.identifier_at(i) != panel_type.idname {
                return false;
            }
            i += 1;
        }

        i == data_len
    }
}

impl std::ops::Index<PanelId> for PanelTree {
    type Output = Panel;

    fn index(&self, id: PanelId) -> &Panel {
        self.get(id)
            .unwrap_or_else(|| panic!("stale or invalid panel id {:?}", id))
    }
}

impl std::ops::IndexMut<PanelId> for PanelTree {
    fn index_mut(&mut self, id: PanelId) -> &mut Panel {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("stale or invalid panel id {:?}", id))
    }
}
