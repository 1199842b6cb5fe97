//! Region model - the complete state of a panel region
//!
//! This module contains all the state types following the Elm Architecture
//! pattern. Transitions live in `update`, geometry queries in `view`.

pub mod category;
pub mod geometry;
pub mod interaction;
pub mod panel;
pub mod panel_type;
pub mod tree;

pub use category::{ActiveCategoryStack, CategoryTab};
pub use geometry::{IRect, Point, Rect, RegionView};
pub use interaction::{HandlerResult, InteractionState, ModalHandler, PanelState, TimerHandle};
pub use panel::{CustomData, Panel, PanelFlags, RuntimeFlags, Snap};
pub use panel_type::{
    PanelCallbacks, PanelType, PanelTypeFlags, PanelTypeId, PanelTypeRegistry,
};
pub use tree::{ListData, PanelId, PanelTree};

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::commands::Cmd;
use crate::config::PanelConfig;

/// Which side of the area the region is attached to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionAlignment {
    #[default]
    None,
    Left,
    Right,
    /// Free-floating overlay; panels cannot be dragged
    Float,
}

/// The widget currently handling input inside the region, if any
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveButton {
    /// Accepts ctrl+wheel to cycle its own values
    pub supports_cycling: bool,
}

/// Property search state reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// A search string is entered
    pub active: bool,
    /// The search string changed since the last layout pass
    pub update: bool,
}

/// A region holding stacked panels
#[derive(Debug)]
pub struct Region {
    pub types: PanelTypeRegistry,
    pub panels: PanelTree,

    /// Category tabs found during the last layout pass
    pub categories: Vec<CategoryTab>,
    pub active_categories: ActiveCategoryStack,

    pub alignment: RegionAlignment,
    pub view: RegionView,
    pub config: PanelConfig,

    /// Panels laid out during the current pass, in begin order
    pub blocks: Vec<PanelId>,
    /// Modal handlers, most recently added last
    pub handlers: Vec<ModalHandler>,
    pub active_button: Option<ActiveButton>,
    pub search_filter: SearchFilter,

    /// Context string used to filter panel types (`None` shows every context)
    pub context: Option<String>,
    /// The host switched what the region displays; realign on the next pass
    pub content_changed: bool,
}

impl Region {
    pub fn new(types: PanelTypeRegistry, config: PanelConfig, win_rect: IRect) -> Self {
        Self {
            types,
            panels: PanelTree::new(),
            categories: Vec::new(),
            active_categories: ActiveCategoryStack::new(),
            alignment: RegionAlignment::None,
            view: RegionView::new(win_rect),
            config,
            blocks: Vec::new(),
            handlers: Vec::new(),
            active_button: None,
            search_filter: SearchFilter::default(),
            context: None,
            content_changed: false,
        }
    }

    pub fn with_alignment(mut self, alignment: RegionAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id)
    }

    /// Type of a live panel, `None` if the panel is gone or lost its type
    pub fn panel_type(&self, id: PanelId) -> Option<&PanelType> {
        self.panels
            .get(id)
            .and_then(|p| p.type_id)
            .map(|t| &self.types[t])
    }

    pub fn has_header(&self, id: PanelId) -> bool {
        self.panel_type(id).is_some_and(|t| !t.flags.no_header)
    }

    pub fn is_subpanel(&self, id: PanelId) -> bool {
        self.panel_type(id).is_some_and(PanelType::is_subpanel)
    }

    /// Header height for this panel, zero for headerless panels
    pub fn header_height_of(&self, id: PanelId) -> i32 {
        if self.has_header(id) {
            self.config.header_height
        } else {
            0
        }
    }

    /// Earliest pending drag or animation timer
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.panels
            .all()
            .into_iter()
            .filter_map(|id| self.panels[id].interaction.as_ref())
            .filter_map(|state| state.timer.map(|t| t.next_fire))
            .min()
    }

    pub fn has_panel_handler(&self, id: PanelId) -> bool {
        self.handlers.iter().any(|h| h.panel() == Some(id))
    }

    /// Check handler and block bookkeeping after a message
    ///
    /// Every panel handler points at a live panel with interaction state,
    /// each interacting panel has exactly one handler, and blocks only hold
    /// live panels.
    #[cfg(debug_assertions)]
    pub fn assert_invariants_with_context(&self, context: &str) {
        for handler in &self.handlers {
            if let Some(id) = handler.panel() {
                debug_assert!(
                    self.panels.get(id).is_some_and(|p| p.interaction.is_some()),
                    "[{}] panel handler without live interaction state",
                    context
                );
            }
        }
        for id in self.panels.all() {
            if self.panels[id].interaction.is_some() {
                let count = self.handlers.iter().filter(|h| h.panel() == Some(id)).count();
                debug_assert_eq!(count, 1, "[{}] panel '{}' handler count", context, self.panels[id].name);
            }
        }
        debug_assert!(
            self.blocks.iter().all(|&id| self.panels.contains(id)),
            "[{}] stale block",
            context
        );
    }

    /// No-op in release builds
    #[cfg(not(debug_assertions))]
    #[inline]
    pub fn assert_invariants_with_context(&self, _context: &str) {}

    // ========================================================================
    // Categories
    // ========================================================================

    /// Tabs are only shown when there is more than one category
    pub fn categories_visible(&self) -> bool {
        self.categories.len() > 1
    }

    /// Tabs are drawn on the left unless the region is right-aligned
    pub fn category_tabs_on_left(&self) -> bool {
        self.alignment != RegionAlignment::Right
    }

    pub fn category_add(&mut self, idname: &str) {
        self.categories.push(CategoryTab::new(idname));
    }

    pub fn category_clear_all(&mut self) {
        self.categories.clear();
    }

    pub fn category_find(&self, idname: &str) -> Option<&CategoryTab> {
        self.categories.iter().find(|c| c.idname == idname)
    }

    /// Tab under a window-space pointer position
    pub fn category_find_mouse_over(&self, pos: Point) -> Option<&CategoryTab> {
        let (x, y) = self.view.window_to_region(pos);
        self.categories.iter().find(|c| c.rect.contains(x, y))
    }

    pub fn category_active_set(&mut self, idname: &str) {
        self.active_categories.set(idname, false, &self.types);
    }

    /// Make `idname` the fallback active category if nothing chose it yet
    pub fn category_active_set_default(&mut self, idname: &str) {
        self.active_categories.set_default(idname, &self.types);
    }

    /// Active category among the current tabs
    ///
    /// With `set_fallback`, an empty or stale stack falls back to the first
    /// tab, which is recorded as a fallback entry.
    pub fn category_active_get(&mut self, set_fallback: bool) -> Option<String> {
        if let Some(active) = self.active_categories.first_present(&self.categories) {
            return Some(active.to_string());
        }
        if set_fallback {
            let first = self.categories.first()?.idname.clone();
            self.active_categories.set(&first, true, &self.types);
            return Some(first);
        }
        None
    }

    /// Read-only variant of `category_active_get` without fallback
    pub fn category_active(&self) -> Option<&str> {
        self.active_categories.first_present(&self.categories)
    }
}

/// Per-call context threaded through every operation that needs time or
/// pointer state, or that emits commands for the host
#[derive(Debug)]
pub struct RegionContext {
    pub now: Instant,
    /// Latest window-space pointer position
    pub pointer: Point,
    cmds: Vec<Cmd>,
}

impl RegionContext {
    pub fn new(now: Instant, pointer: Point) -> Self {
        Self {
            now,
            pointer,
            cmds: Vec::new(),
        }
    }

    pub fn emit(&mut self, cmd: Cmd) {
        if cmd != Cmd::None {
            self.cmds.push(cmd);
        }
    }

    pub fn tag_redraw(&mut self) {
        if !self.cmds.contains(&Cmd::Redraw) {
            self.cmds.push(Cmd::Redraw);
        }
    }

    /// Drain queued commands into a single command
    pub fn take_cmd(&mut self) -> Option<Cmd> {
        match Cmd::batch(std::mem::take(&mut self.cmds)) {
            Cmd::None => None,
            cmd => Some(cmd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_with_categories(categories: &[&str]) -> Region {
        let mut types = PanelTypeRegistry::new();
        for (i, c) in categories.iter().enumerate() {
            types.register(PanelType::new(format!("PT_{}", i), "P").with_category(*c));
        }
        let mut region = Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600));
        for c in categories {
            region.category_add(c);
        }
        region
    }

    #[test]
    fn test_active_get_falls_back_to_first_tab() {
        let mut region = region_with_categories(&["Tool", "View"]);
        assert_eq!(region.category_active_get(false), None);
        assert_eq!(region.category_active_get(true).as_deref(), Some("Tool"));
        // The fallback is remembered
        assert_eq!(region.category_active(), Some("Tool"));

        region.category_active_set("View");
        assert_eq!(region.category_active_get(true).as_deref(), Some("View"));
    }

    #[test]
    fn test_set_default_never_overrides_a_choice() {
        let mut region = region_with_categories(&["Tool", "View"]);
        region.category_active_set("View");
        region.category_active_set_default("Tool");
        assert_eq!(region.category_active(), Some("View"));
        assert_eq!(
            region.active_categories.entries(),
            &["View".to_string(), "Tool".to_string()]
        );
    }

    #[test]
    fn test_categories_visible_needs_two() {
        let region = region_with_categories(&["Tool"]);
        assert!(!region.categories_visible());
        let region = region_with_categories(&["Tool", "View"]);
        assert!(region.categories_visible());
    }

    #[test]
    fn test_context_batches_commands() {
        let mut ctx = RegionContext::new(Instant::now(), Point::default());
        assert_eq!(ctx.take_cmd(), None);
        ctx.tag_redraw();
        ctx.tag_redraw();
        assert_eq!(ctx.take_cmd(), Some(Cmd::Redraw));
    }
}
