//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use panelstack::config::PanelConfig;
use panelstack::messages::{InputEvent, MouseButton, Msg};
use panelstack::model::{
    IRect, Panel, PanelId, PanelType, PanelTypeRegistry, Point, Region, RegionContext,
};
use panelstack::update::{layout_region, update, ContentBuilder};
use panelstack::view::layout_category_tabs;

/// Content builder with per-type heights and an optional poll filter
#[derive(Debug, Clone)]
pub struct TestBuilder {
    pub default_height: i32,
    pub heights: HashMap<String, i32>,
    /// Types listed here fail their poll
    pub hidden: Vec<String>,
    /// Types whose content matches the search string
    pub search_matches: Vec<String>,
}

impl TestBuilder {
    pub fn new(default_height: i32) -> Self {
        Self {
            default_height,
            heights: HashMap::new(),
            hidden: Vec::new(),
            search_matches: Vec::new(),
        }
    }

    pub fn with_height(mut self, idname: &str, height: i32) -> Self {
        self.heights.insert(idname.to_string(), height);
        self
    }
}

impl ContentBuilder for TestBuilder {
    fn poll(&mut self, panel_type: &PanelType) -> bool {
        !self.hidden.contains(&panel_type.idname)
    }

    fn build(&mut self, panel_type: &PanelType, _panel: &Panel, _width: i32) -> i32 {
        self.heights
            .get(&panel_type.idname)
            .copied()
            .unwrap_or(self.default_height)
    }

    fn matches_search(&mut self, panel_type: &PanelType, _panel: &Panel) -> bool {
        self.search_matches.contains(&panel_type.idname)
    }
}

pub fn test_ctx() -> RegionContext {
    RegionContext::new(Instant::now(), Point::default())
}

/// A 300x600 region at the window origin with one plain type per name
pub fn test_region(names: &[&str]) -> Region {
    let mut types = PanelTypeRegistry::new();
    for name in names {
        types.register(PanelType::new(*name, *name));
    }
    Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600))
}

/// `test_region` after one layout pass with 100px of content per panel
pub fn laid_out_region(names: &[&str]) -> (Region, Vec<PanelId>) {
    let mut region = test_region(names);
    layout_region(&mut region, &mut test_ctx(), &mut TestBuilder::new(100));
    let ids = region.panels.roots().to_vec();
    (region, ids)
}

/// Panels PT_a, PT_b, PT_c in categories A, B, C, with tabs laid out
pub fn tabbed_region() -> Region {
    let mut types = PanelTypeRegistry::new();
    for (name, category) in [("PT_a", "A"), ("PT_b", "B"), ("PT_c", "C")] {
        types.register(PanelType::new(name, name).with_category(category));
    }
    let mut region = Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600));
    layout_region(&mut region, &mut test_ctx(), &mut TestBuilder::new(100));
    layout_category_tabs(&mut region, |label| label.len() as i32 * 7);
    region
}

/// Window position of the middle of a category tab
pub fn tab_center(region: &Region, idname: &str) -> Point {
    let rect = region
        .category_find(idname)
        .map(|tab| tab.rect)
        .unwrap_or_else(|| panic!("no tab {}", idname));
    Point::new(
        (region.view.win_rect.xmin + (rect.xmin + rect.xmax) / 2) as f32,
        (region.view.win_rect.ymin + (rect.ymin + rect.ymax) / 2) as f32,
    )
}

/// Window position `x` pixels into the middle of a panel's header
pub fn header_point(region: &Region, id: PanelId, x: f32) -> Point {
    let panel = &region.panels[id];
    let header_mid = (panel.ofs_y + panel.size_y) as f32 + region.config.header_height as f32 * 0.5;
    let view_x = (panel.ofs_x as f32) + x;
    region.view.view_to_window(Point::new(view_x, header_mid))
}

/// Top edge of a panel's header in view space
pub fn top_edge(region: &Region, id: PanelId) -> i32 {
    region.panels[id].top_edge(region.header_height_of(id))
}

pub fn send(region: &mut Region, ctx: &mut RegionContext, event: InputEvent) {
    update(region, ctx, Msg::Input(event));
}

pub fn click(region: &mut Region, ctx: &mut RegionContext, pos: Point) {
    send(region, ctx, InputEvent::press(MouseButton::Left, pos));
    send(region, ctx, InputEvent::release(MouseButton::Left, pos));
}

/// Advance the clock far enough for every animation to finish, then tick
pub fn settle(region: &mut Region, ctx: &mut RegionContext) {
    ctx.now += Duration::from_secs(1);
    update(region, ctx, Msg::Tick);
}
