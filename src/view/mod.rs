//! View module - hit-testing and the draw pass
//!
//! Drawing is delegated to a `Renderer` sink that receives finished window
//! space rectangles and theme colors. Nothing drawn here feeds back into
//! layout.

pub mod tabs;

pub use hit_test::{
    custom_data_under_cursor, header_rect, mouse_state, panel_local, panel_rect,
    panel_under_cursor, HeaderZones, PanelMouseState,
};
pub use tabs::{layout_category_tabs, over_tab_strip};

use crate::model::{PanelId, Point, Rect, Region, RegionAlignment};
use crate::theme::{Color, Theme, ThemeRole};

/// Kind of filled shape the renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeStyle {
    /// Header strip of a top-level panel
    Header,
    /// Content area background
    Backdrop,
    /// Rounded inset box drawn behind box-style panels
    Box,
    /// Unfilled outline
    Outline,
    /// Background of the whole tab strip
    TabStrip,
    Tab { active: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Triangle pointing right (panel closed)
    DisclosureRight,
    /// Triangle pointing down (panel open)
    DisclosureDown,
    Pin,
    DragHandle,
}

/// Drawing sink supplied by the host
pub trait Renderer {
    /// Width of `text` in pixels at the UI font size
    fn text_width(&self, text: &str) -> i32;
    fn draw_panel_chrome(&mut self, rect: Rect, style: ChromeStyle, color: Color);
    fn draw_icon(&mut self, icon: Icon, rect: Rect, color: Color);
    /// Rotated text runs bottom to top, starting at the rect's min corner
    fn draw_text(&mut self, text: &str, rect: Rect, color: Color, rotated: bool);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Chrome {
        rect: Rect,
        style: ChromeStyle,
        color: Color,
    },
    Icon {
        icon: Icon,
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        rect: Rect,
        color: Color,
        rotated: bool,
    },
}

/// Renderer that records draw calls, measuring text as fixed-width glyphs
#[derive(Debug, Clone)]
pub struct DrawList {
    pub char_width: i32,
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn new(char_width: i32) -> Self {
        Self {
            char_width,
            items: Vec::new(),
        }
    }

    pub fn icons(&self) -> impl Iterator<Item = Icon> + '_ {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Icon { icon, .. } => Some(*icon),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Color)> + '_ {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
    }
}

impl Renderer for DrawList {
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.char_width
    }

    fn draw_panel_chrome(&mut self, rect: Rect, style: ChromeStyle, color: Color) {
        self.items.push(DrawItem::Chrome { rect, style, color });
    }

    fn draw_icon(&mut self, icon: Icon, rect: Rect, color: Color) {
        self.items.push(DrawItem::Icon { icon, rect, color });
    }

    fn draw_text(&mut self, text: &str, rect: Rect, color: Color, rotated: bool) {
        self.items.push(DrawItem::Text {
            text: text.to_string(),
            rect,
            color,
            rotated,
        });
    }
}

// ============================================================================
// Panels
// ============================================================================

/// Color of a panel's title and header icons
///
/// While a search is active, matching panels can be highlighted and the
/// others are dimmed to half opacity.
pub fn title_color(region: &Region, theme: &Theme, id: PanelId, use_search_color: bool) -> Color {
    let search_active = region.search_filter.active;
    let matched = region.panels[id].runtime.search_match;

    if search_active && matched && use_search_color {
        return theme.color(ThemeRole::SearchMatch);
    }
    let color = theme.color(ThemeRole::Title);
    if search_active && !matched {
        color.with_alpha(color.a / 2)
    } else {
        color
    }
}

/// Draw every panel laid out in the current pass
///
/// Panels draw in begin order, with selected (dragged) panels last so they
/// end up on top.
pub fn draw_panels<R: Renderer + ?Sized>(region: &Region, theme: &Theme, renderer: &mut R) {
    let live: Vec<PanelId> = region
        .blocks
        .iter()
        .copied()
        .filter(|&id| region.panels.get(id).is_some_and(|p| p.runtime.active))
        .collect();

    let (selected, unselected): (Vec<PanelId>, Vec<PanelId>) = live
        .into_iter()
        .partition(|&id| region.panels[id].flags.selected);

    for id in unselected.into_iter().chain(selected) {
        draw_panel(region, theme, renderer, id);
    }
}

fn draw_panel<R: Renderer + ?Sized>(region: &Region, theme: &Theme, renderer: &mut R, id: PanelId) {
    let Some(panel_type) = region.panel_type(id) else {
        return;
    };
    let panel = &region.panels[id];
    let view = &region.view;
    let to_window = |r: Rect| view.rect_to_window(r);

    let is_sub = panel_type.is_subpanel();
    let is_box = panel_type.flags.draw_box;
    let show_background = region.alignment != RegionAlignment::Float;
    let rect = panel_rect(region, id);

    if !region.has_header(id) {
        if show_background {
            renderer.draw_panel_chrome(
                to_window(rect),
                ChromeStyle::Backdrop,
                theme.color(ThemeRole::PanelBack),
            );
        }
        return;
    }

    let head = header_rect(region, id);
    let unit = region.config.icon_size;
    let header_height = region.config.header_height as f32;
    let closed = panel.flags.closed;

    if is_box && !is_sub && show_background {
        let ymin = if closed { head.ymin } else { rect.ymin };
        let box_rect = Rect::new(rect.xmin, rect.xmax, ymin, head.ymax);
        renderer.draw_panel_chrome(
            to_window(box_rect),
            ChromeStyle::Box,
            theme.color(ThemeRole::PanelBack),
        );
        renderer.draw_panel_chrome(
            to_window(box_rect),
            ChromeStyle::Outline,
            theme.color(ThemeRole::BoxOutline),
        );
    }

    if show_background && !is_sub && !is_box {
        let role = if region.search_filter.active && panel.runtime.search_match {
            ThemeRole::SearchMatch
        } else {
            ThemeRole::PanelHeader
        };
        renderer.draw_panel_chrome(to_window(head), ChromeStyle::Header, theme.color(role));
    }

    let icon_color = title_color(region, theme, id, false);

    if region.categories_visible() && !is_sub && panel.flags.pinned {
        let xmin = head.xmax - unit * 2.2;
        let pin = Rect::new(xmin, xmin + unit, head.ymin, head.ymax);
        renderer.draw_icon(Icon::Pin, to_window(pin), icon_color);
    }

    let mut title_rect = head;
    if is_sub {
        title_rect.xmin += unit * 0.7;
    }
    let label = if panel.draw_name.is_empty() {
        panel_type.label.as_str()
    } else {
        panel.draw_name.as_str()
    };
    let text_rect = Rect::new(
        title_rect.xmin + unit * 1.1,
        title_rect.xmax,
        title_rect.ymin,
        title_rect.ymax,
    );
    renderer.draw_text(
        label,
        to_window(text_rect),
        title_color(region, theme, id, is_sub),
        false,
    );

    if !is_sub {
        let xmax = head.xmax - unit * 0.2;
        let handle = Rect::new(xmax - header_height, xmax, head.ymin, head.ymax).scaled(0.7);
        renderer.draw_icon(Icon::DragHandle, to_window(handle), icon_color);
    }

    if !closed {
        if panel.flags.selected && !is_sub {
            let outline = Rect::new(rect.xmin, rect.xmax, rect.ymin, head.ymax);
            renderer.draw_panel_chrome(
                to_window(outline),
                ChromeStyle::Outline,
                theme.color(ThemeRole::Back).shade(-120),
            );
        }

        if show_background && !(is_box && !is_sub) {
            let role = if is_sub {
                ThemeRole::PanelSubBack
            } else {
                ThemeRole::PanelBack
            };
            renderer.draw_panel_chrome(to_window(rect), ChromeStyle::Backdrop, theme.color(role));
        }
    }

    let triangle = Rect::new(
        title_rect.xmin,
        title_rect.xmin + header_height,
        head.ymin,
        head.ymax,
    )
    .scaled(0.25);
    let icon = if closed {
        Icon::DisclosureRight
    } else {
        Icon::DisclosureDown
    };
    renderer.draw_icon(icon, to_window(triangle), icon_color);
}

// ============================================================================
// Category tabs
// ============================================================================

/// Lay out and draw the category tab strip
///
/// Does nothing unless more than one category is present.
pub fn draw_category_tabs<R: Renderer + ?Sized>(region: &mut Region, theme: &Theme, renderer: &mut R) {
    if !region.categories_visible() {
        return;
    }
    layout_category_tabs(region, |text| renderer.text_width(text));

    let win = region.view.win_rect;
    let to_window = |r: Rect| {
        Rect::new(
            r.xmin + win.xmin as f32,
            r.xmax + win.xmin as f32,
            r.ymin + win.ymin as f32,
            r.ymax + win.ymin as f32,
        )
    };

    let margin = region.config.category_margin as f32;
    let (width, height) = (win.width() as f32, win.height() as f32);
    let strip = if region.category_tabs_on_left() {
        Rect::new(0.0, margin, 0.0, height)
    } else {
        Rect::new(width - margin, width, 0.0, height)
    };
    renderer.draw_panel_chrome(
        to_window(strip),
        ChromeStyle::TabStrip,
        theme.color(ThemeRole::TabBack),
    );

    let active = region.category_active().map(str::to_string);
    for tab in &region.categories {
        let is_active = active.as_deref() == Some(tab.idname.as_str());
        let rect = tab.rect.to_rect();
        let (fill, text) = if is_active {
            (ThemeRole::TabActive, ThemeRole::TextHighlight)
        } else {
            (ThemeRole::TabInactive, ThemeRole::Text)
        };

        renderer.draw_panel_chrome(
            to_window(rect),
            ChromeStyle::Tab { active: is_active },
            theme.color(fill),
        );
        renderer.draw_panel_chrome(
            to_window(rect),
            ChromeStyle::Outline,
            theme.color(ThemeRole::TabOutline),
        );

        let origin = Point::new(rect.xmax - rect.width() * 0.3, rect.ymin + 5.0);
        let text_rect = Rect::new(origin.x, rect.xmax, origin.y, rect.ymax);
        renderer.draw_text(&tab.idname, to_window(text_rect), theme.color(text), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::model::{IRect, Panel, PanelType, PanelTypeRegistry};

    fn region_with(types: PanelTypeRegistry) -> Region {
        Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600))
    }

    fn add_panel(region: &mut Region, type_name: &str, ofs_y: i32) -> PanelId {
        let type_id = region
            .types
            .find(type_name)
            .expect("type registered");
        let mut panel = Panel::new(type_id, type_name);
        panel.size_x = 300;
        panel.size_y = 100;
        panel.ofs_y = ofs_y;
        panel.runtime.active = true;
        let id = region.panels.insert(panel, None);
        region.blocks.push(id);
        id
    }

    #[test]
    fn test_disclosure_follows_closed_state() {
        let mut types = PanelTypeRegistry::new();
        types.register(PanelType::new("PT_a", "Alpha"));
        let mut region = region_with(types);
        let id = add_panel(&mut region, "PT_a", -120);
        let theme = Theme::default();

        let mut list = DrawList::new(7);
        draw_panels(&region, &theme, &mut list);
        assert!(list.icons().any(|i| i == Icon::DisclosureDown));
        assert!(list.texts().any(|(t, _)| t == "Alpha"));

        region.panels[id].flags.closed = true;
        let mut list = DrawList::new(7);
        draw_panels(&region, &theme, &mut list);
        assert!(list.icons().any(|i| i == Icon::DisclosureRight));
        assert!(!list
            .items
            .iter()
            .any(|item| matches!(item, DrawItem::Chrome { style: ChromeStyle::Backdrop, .. })));
    }

    #[test]
    fn test_selected_panel_draws_last() {
        let mut types = PanelTypeRegistry::new();
        types.register(PanelType::new("PT_a", "Alpha"));
        types.register(PanelType::new("PT_b", "Beta"));
        let mut region = region_with(types);
        let a = add_panel(&mut region, "PT_a", -120);
        add_panel(&mut region, "PT_b", -240);
        region.panels[a].flags.selected = true;

        let mut list = DrawList::new(7);
        draw_panels(&region, &Theme::default(), &mut list);
        let titles: Vec<&str> = list.texts().map(|(t, _)| t).collect();
        assert_eq!(titles, vec!["Beta", "Alpha"]);
    }

    #[test]
    fn test_headerless_panel_draws_only_background() {
        let mut types = PanelTypeRegistry::new();
        types.register(PanelType::new("PT_a", "Alpha").no_header());
        let mut region = region_with(types);
        add_panel(&mut region, "PT_a", -100);

        let mut list = DrawList::new(7);
        draw_panels(&region, &Theme::default(), &mut list);
        assert_eq!(list.items.len(), 1);
    }

    #[test]
    fn test_title_dimmed_when_search_misses() {
        let mut types = PanelTypeRegistry::new();
        types.register(PanelType::new("PT_a", "Alpha"));
        let mut region = region_with(types);
        let id = add_panel(&mut region, "PT_a", -120);
        let theme = Theme::default();
        let title = theme.color(ThemeRole::Title);

        region.search_filter.active = true;
        assert_eq!(title_color(&region, &theme, id, true).a, title.a / 2);

        region.panels[id].runtime.search_match = true;
        assert_eq!(
            title_color(&region, &theme, id, true),
            theme.color(ThemeRole::SearchMatch)
        );
        assert_eq!(title_color(&region, &theme, id, false), title);
    }

    #[test]
    fn test_tabs_drawn_only_with_several_categories() {
        let mut region = region_with(PanelTypeRegistry::new());
        region.category_add("Tool");
        let mut list = DrawList::new(7);
        draw_category_tabs(&mut region, &Theme::default(), &mut list);
        assert!(list.items.is_empty());

        region.category_add("View");
        region.category_active_set("View");
        draw_category_tabs(&mut region, &Theme::default(), &mut list);
        let active: Vec<bool> = list
            .items
            .iter()
            .filter_map(|item| match item {
                DrawItem::Chrome {
                    style: ChromeStyle::Tab { active },
                    ..
                } => Some(*active),
                _ => None,
            })
            .collect();
        assert_eq!(active, vec![false, true]);
        assert_eq!(list.texts().count(), 2);
    }
}
