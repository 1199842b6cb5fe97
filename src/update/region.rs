//! Region event router: category tabs, header actions and drag-collapse
//!
//! Only press events reach the router. Pointer moves are consumed by the
//! modal handlers (panel drag and drag-collapse) before the router runs.

use crate::commands::Cmd;
use crate::messages::{Action, EventKind, InputEvent, KeyCode, Modifiers, MouseButton, WheelDirection};
use crate::model::{HandlerResult, ModalHandler, PanelId, PanelState, Point, Rect, Region, RegionAlignment, RegionContext, Snap};
use crate::view::{mouse_state, over_tab_strip, panel_local, HeaderZones, PanelMouseState};

use super::interaction::{activate, set_closed_recursive};
use super::lifecycle::{collapse_all, sync_list_data_expand_flags};

/// What triggered a header action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTrigger {
    /// Left click; the horizontal zone decides the action
    Click,
    /// Return or keypad enter over the header
    Confirm,
    /// The collapse key anywhere over the panel
    CollapseKey,
}

fn is_collapse_key(region: &Region, event: &InputEvent) -> bool {
    event.kind == EventKind::Key(KeyCode::Char(region.config.collapse_key))
        && event.modifiers.is_empty()
}

/// Route a press event to tabs and panel headers
pub fn handle_region_event(
    region: &mut Region,
    ctx: &mut RegionContext,
    event: &InputEvent,
) -> HandlerResult {
    if event.kind == EventKind::PointerMove || event.action != Action::Press {
        return HandlerResult::Continue;
    }

    // Scrollbars overlap panels and win
    if region.view.mouse_in_scrollers(event.pos) {
        return HandlerResult::Continue;
    }

    if region.categories_visible() {
        match event.kind {
            EventKind::Mouse(MouseButton::Left) => {
                let tab = region
                    .category_find_mouse_over(event.pos)
                    .map(|tab| tab.idname.clone());
                if let Some(idname) = tab {
                    tracing::debug!(category = %idname, "tab clicked");
                    region.category_active_set(&idname);
                    region.view.offset_to(None, Some(1.0));
                    ctx.tag_redraw();
                    return HandlerResult::Break;
                }
            }
            EventKind::Key(KeyCode::Tab) if event.modifiers.ctrl() => {
                if handle_category_cycling(region, ctx, event) == HandlerResult::Break {
                    return HandlerResult::Break;
                }
            }
            EventKind::Wheel(_) => {
                if handle_category_cycling(region, ctx, event) == HandlerResult::Break {
                    return HandlerResult::Break;
                }
            }
            _ => {}
        }
    }

    let has_active_button = region.active_button.is_some();
    let mut result = HandlerResult::Continue;

    // Newest blocks first, matching what is drawn on top
    for id in region.blocks.clone().into_iter().rev() {
        if !region.panels.contains(id) || !region.has_header(id) {
            continue;
        }

        let local = panel_local(region, id, event.pos);
        let state = mouse_state(region, id, local);

        // The collapse key beats active button handling
        if state.is_inside() && is_collapse_key(region, event) {
            handle_panel_header(region, ctx, id, local.x, HeaderTrigger::CollapseKey, event.modifiers);
            return HandlerResult::Break;
        }

        if has_active_button {
            continue;
        }

        // Clicks inside a panel are consumed, but a sub-panel header under
        // the pointer still gets its turn
        if event.kind == EventKind::Mouse(MouseButton::Left) && state.is_inside() {
            result = HandlerResult::Break;
        }

        if state == PanelMouseState::InsideHeader {
            match event.kind {
                EventKind::Mouse(MouseButton::Left) => {
                    handle_panel_header(region, ctx, id, local.x, HeaderTrigger::Click, event.modifiers);
                    result = HandlerResult::Break;
                }
                EventKind::Key(KeyCode::Return | KeyCode::PadEnter) => {
                    handle_panel_header(region, ctx, id, local.x, HeaderTrigger::Confirm, event.modifiers);
                    result = HandlerResult::Break;
                }
                EventKind::Mouse(MouseButton::Right) => {
                    ctx.emit(Cmd::OpenContextMenu { panel: id });
                    result = HandlerResult::Break;
                }
                _ => {}
            }
            break;
        }
    }

    result
}

/// Step through the category tabs with ctrl+tab or the wheel
///
/// The wheel only cycles with ctrl held or over the tab strip. Both wrap
/// around at either end.
fn handle_category_cycling(
    region: &mut Region,
    ctx: &mut RegionContext,
    event: &InputEvent,
) -> HandlerResult {
    let is_wheel = matches!(event.kind, EventKind::Wheel(_));
    let (x, _) = region.view.window_to_region(event.pos);
    if is_wheel && !event.modifiers.ctrl() && !over_tab_strip(region, x) {
        return HandlerResult::Continue;
    }

    // Lets ctrl+wheel cycle the values of the button under the pointer
    if region.active_button.is_some_and(|b| b.supports_cycling) {
        return HandlerResult::Continue;
    }

    let current = region
        .category_active()
        .and_then(|active| region.categories.iter().position(|c| c.idname == active));
    if let Some(index) = current {
        let len = region.categories.len();
        let backwards = match event.kind {
            EventKind::Wheel(WheelDirection::Up) => true,
            EventKind::Wheel(WheelDirection::Down) => false,
            _ => event.modifiers.shift(),
        };
        let next = if backwards {
            (index + len - 1) % len
        } else {
            (index + 1) % len
        };

        // Scroll is kept so tabs can be browsed quickly
        let idname = region.categories[next].idname.clone();
        tracing::debug!(category = %idname, "cycled category");
        region.category_active_set(&idname);
        ctx.tag_redraw();
    }

    HandlerResult::Break
}

/// Act on a header press at block-space x coordinate `local_x`
pub fn handle_panel_header(
    region: &mut Region,
    ctx: &mut RegionContext,
    id: PanelId,
    local_x: f32,
    trigger: HeaderTrigger,
    modifiers: Modifiers,
) {
    debug_assert!(region.has_header(id));

    let is_sub = region.is_subpanel(id);
    let use_pin = region.categories_visible() && !is_sub;
    let zones = HeaderZones::compute(region, id);

    if use_pin && trigger != HeaderTrigger::CollapseKey && modifiers.shift() {
        let panel = &mut region.panels[id];
        panel.flags.pinned = !panel.flags.pinned;
        ctx.tag_redraw();
        return;
    }

    if trigger != HeaderTrigger::Click || local_x < zones.expansion_xmax {
        toggle_expansion(region, ctx, id, trigger, modifiers);
        return;
    }

    // Floating regions keep their panels in place
    if region.alignment != RegionAlignment::Float && zones.in_drag(local_x) {
        activate(region, ctx, id, PanelState::Dragging);
        return;
    }

    if zones.in_pin(local_x) {
        let panel = &mut region.panels[id];
        panel.flags.pinned = !panel.flags.pinned;
        ctx.tag_redraw();
    }
}

fn toggle_expansion(
    region: &mut Region,
    ctx: &mut RegionContext,
    id: PanelId,
    trigger: HeaderTrigger,
    modifiers: Modifiers,
) {
    if modifiers.ctrl() && !region.is_subpanel(id) {
        let first_child = region.panels.children(id).first().copied();
        match first_child {
            Some(child) if !region.panels[id].flags.closed => {
                // Children follow the inverse of the first child; the
                // parent is reopened below
                let close = !region.panels[child].flags.closed;
                set_closed_recursive(region, id, close);
                region.panels[id].flags.closed = true;
            }
            _ => {
                collapse_all(region, id);
                region.view.offset_to(Some(0.0), Some(1.0));
            }
        }
    }

    let panel = &mut region.panels[id];
    let was_open = !panel.flags.closed;
    panel.flags.closed = was_open;
    if panel.snap == Snap::Bottom {
        panel.ofs_y = if was_open { -panel.size_y } else { 0 };
    }
    tracing::debug!(panel = %panel.name, closed = was_open, "toggled panel");

    if trigger == HeaderTrigger::Click {
        region.handlers.push(ModalHandler::DragCollapse {
            was_first_open: was_open,
            xy_init: ctx.pointer,
        });
    }

    sync_list_data_expand_flags(region);
    activate(region, ctx, id, PanelState::Animating);
}

// ============================================================================
// Drag-collapse
// ============================================================================

/// Force every header swept by the pointer to the first panel's new state
///
/// The sweep is locked to the horizontal position where it started.
pub fn drag_collapse(
    region: &mut Region,
    ctx: &mut RegionContext,
    was_first_open: bool,
    xy_init: Point,
    xy_dst: Point,
) {
    let xy_dst = Point::new(xy_init.x, xy_dst.y);
    let header_height = region.config.header_height as f32;

    for id in region.blocks.clone() {
        if !region.panels.contains(id) || !region.has_header(id) {
            continue;
        }
        let a = panel_local(region, id, xy_init);
        let b = panel_local(region, id, xy_dst);

        let panel = &region.panels[id];
        let (size_x, size_y) = (panel.size_x as f32, panel.size_y as f32);
        let header = Rect::new(0.0, size_x, size_y, size_y + header_height);
        if !header.intersects_segment(a, b) || panel.flags.closed == was_first_open {
            continue;
        }

        region.panels[id].flags.closed = was_first_open;
        activate(region, ctx, id, PanelState::Animating);
    }

    sync_list_data_expand_flags(region);
}

/// Modal handler for a drag-collapse sweep
///
/// Swallows every left button event and ends on release.
pub fn handle_drag_collapse_event(
    region: &mut Region,
    ctx: &mut RegionContext,
    was_first_open: bool,
    xy_init: Point,
    event: &InputEvent,
) -> HandlerResult {
    match event.kind {
        EventKind::PointerMove => {
            drag_collapse(region, ctx, was_first_open, xy_init, event.pos);
            HandlerResult::Break
        }
        EventKind::Mouse(MouseButton::Left) => {
            if event.is_left_release() {
                let handler = ModalHandler::DragCollapse {
                    was_first_open,
                    xy_init,
                };
                if let Some(pos) = region.handlers.iter().position(|h| *h == handler) {
                    region.handlers.remove(pos);
                }
            }
            HandlerResult::Break
        }
        _ => HandlerResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::config::PanelConfig;
    use crate::model::{IRect, Panel, PanelType, PanelTypeRegistry};
    use crate::update::lifecycle::{layout_region, ContentBuilder};

    struct FixedHeight(i32);

    impl ContentBuilder for FixedHeight {
        fn build(&mut self, _: &PanelType, _: &Panel, _: i32) -> i32 {
            self.0
        }
    }

    fn ctx() -> RegionContext {
        RegionContext::new(Instant::now(), Point::default())
    }

    /// Three 100px panels stacked from the top of a 300x600 region
    fn stacked_region() -> (Region, Vec<PanelId>) {
        let mut types = PanelTypeRegistry::new();
        for name in ["PT_a", "PT_b", "PT_c"] {
            types.register(PanelType::new(name, name));
        }
        let mut region = Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600));
        layout_region(&mut region, &mut ctx(), &mut FixedHeight(100));
        let ids = region.panels.roots().to_vec();
        (region, ids)
    }

    /// Window y of the middle of a panel's header
    fn header_y(region: &Region, id: PanelId) -> f32 {
        let panel = &region.panels[id];
        let view_y = (panel.ofs_y + panel.size_y) as f32 + 10.0;
        region.view.view_to_window(Point::new(0.0, view_y)).y
    }

    #[test]
    fn test_header_click_toggles_and_arms_drag_collapse() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        let pos = Point::new(50.0, header_y(&region, ids[0]));
        ctx.pointer = pos;

        let result = handle_region_event(&mut region, &mut ctx, &InputEvent::press(MouseButton::Left, pos));
        assert_eq!(result, HandlerResult::Break);
        assert!(region.panels[ids[0]].flags.closed);
        assert!(region.handlers.iter().any(|h| matches!(
            h,
            ModalHandler::DragCollapse {
                was_first_open: true,
                ..
            }
        )));
        assert!(region.has_panel_handler(ids[0]));
    }

    #[test]
    fn test_collapse_key_toggles_from_content() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        let pos = Point::new(50.0, header_y(&region, ids[1]) - 50.0);

        let event = InputEvent::key(KeyCode::Char('a'), pos);
        assert_eq!(handle_region_event(&mut region, &mut ctx, &event), HandlerResult::Break);
        assert!(region.panels[ids[1]].flags.closed);
        // Keys never start a drag-collapse sweep
        assert!(!region
            .handlers
            .iter()
            .any(|h| matches!(h, ModalHandler::DragCollapse { .. })));
    }

    #[test]
    fn test_ctrl_click_solo_expands() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        let pos = Point::new(50.0, header_y(&region, ids[1]));
        let event = InputEvent::press(MouseButton::Left, pos).with_modifiers(Modifiers::CTRL);

        handle_region_event(&mut region, &mut ctx, &event);
        let closed: Vec<bool> = ids.iter().map(|&id| region.panels[id].flags.closed).collect();
        assert_eq!(closed, vec![true, false, true]);
    }

    #[test]
    fn test_drag_zone_starts_dragging() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        let pos = Point::new(290.0, header_y(&region, ids[0]));

        handle_region_event(&mut region, &mut ctx, &InputEvent::press(MouseButton::Left, pos));
        let state = region.panels[ids[0]].interaction.as_ref().map(|s| s.state);
        assert_eq!(state, Some(PanelState::Dragging));
        assert!(!region.panels[ids[0]].flags.closed);
    }

    #[test]
    fn test_floating_region_ignores_drag_zone() {
        let (region, ids) = stacked_region();
        let mut region = region.with_alignment(RegionAlignment::Float);
        let mut ctx = ctx();
        let pos = Point::new(290.0, header_y(&region, ids[0]));

        handle_region_event(&mut region, &mut ctx, &InputEvent::press(MouseButton::Left, pos));
        assert!(region.panels[ids[0]].interaction.is_none());
    }

    #[test]
    fn test_right_click_opens_context_menu() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        let pos = Point::new(50.0, header_y(&region, ids[2]));

        handle_region_event(&mut region, &mut ctx, &InputEvent::press(MouseButton::Right, pos));
        assert_eq!(ctx.take_cmd(), Some(Cmd::OpenContextMenu { panel: ids[2] }));
    }

    #[test]
    fn test_active_button_blocks_header_clicks() {
        let (mut region, ids) = stacked_region();
        region.active_button = Some(Default::default());
        let mut ctx = ctx();
        let pos = Point::new(50.0, header_y(&region, ids[0]));

        let result = handle_region_event(&mut region, &mut ctx, &InputEvent::press(MouseButton::Left, pos));
        assert_eq!(result, HandlerResult::Continue);
        assert!(!region.panels[ids[0]].flags.closed);
    }

    #[test]
    fn test_snap_bottom_moves_offset() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        region.panels[ids[0]].snap = Snap::Bottom;

        let pos = Point::new(50.0, header_y(&region, ids[0]));
        handle_panel_header(&mut region, &mut ctx, ids[0], 50.0, HeaderTrigger::Confirm, Modifiers::NONE);
        assert_eq!(region.panels[ids[0]].ofs_y, -100);

        ctx.pointer = pos;
        handle_panel_header(&mut region, &mut ctx, ids[0], 50.0, HeaderTrigger::Confirm, Modifiers::NONE);
        assert_eq!(region.panels[ids[0]].ofs_y, 0);
    }

    #[test]
    fn test_drag_collapse_sweep_closes_headers() {
        let (mut region, ids) = stacked_region();
        let mut ctx = ctx();
        let start = Point::new(50.0, header_y(&region, ids[0]));
        let end = Point::new(200.0, header_y(&region, ids[2]));

        drag_collapse(&mut region, &mut ctx, true, start, end);
        assert!(ids.iter().all(|&id| region.panels[id].flags.closed));
    }

    #[test]
    fn test_drag_collapse_release_removes_handler() {
        let (mut region, _) = stacked_region();
        let mut ctx = ctx();
        region.handlers.push(ModalHandler::DragCollapse {
            was_first_open: true,
            xy_init: Point::default(),
        });

        let wheel = InputEvent::wheel(WheelDirection::Up, Point::default());
        assert_eq!(
            handle_drag_collapse_event(&mut region, &mut ctx, true, Point::default(), &wheel),
            HandlerResult::Continue
        );

        let release = InputEvent::release(MouseButton::Left, Point::default());
        assert_eq!(
            handle_drag_collapse_event(&mut region, &mut ctx, true, Point::default(), &release),
            HandlerResult::Break
        );
        assert!(region.handlers.is_empty());
    }

    fn tabbed_region() -> Region {
        let mut types = PanelTypeRegistry::new();
        for (name, category) in [("PT_a", "A"), ("PT_b", "B"), ("PT_c", "C")] {
            types.register(PanelType::new(name, name).with_category(category));
        }
        let mut region = Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600));
        layout_region(&mut region, &mut ctx(), &mut FixedHeight(100));
        crate::view::layout_category_tabs(&mut region, |s| s.len() as i32 * 7);
        region
    }

    #[test]
    fn test_wheel_over_tabs_cycles_and_wraps() {
        let mut region = tabbed_region();
        let mut ctx = ctx();
        assert_eq!(region.category_active(), Some("A"));

        let over_tabs = Point::new(5.0, 300.0);
        let down = InputEvent::wheel(WheelDirection::Down, over_tabs);
        for expected in ["B", "C", "A"] {
            assert_eq!(handle_region_event(&mut region, &mut ctx, &down), HandlerResult::Break);
            assert_eq!(region.category_active(), Some(expected));
        }

        let up = InputEvent::wheel(WheelDirection::Up, over_tabs);
        handle_region_event(&mut region, &mut ctx, &up);
        assert_eq!(region.category_active(), Some("C"));
    }

    #[test]
    fn test_wheel_outside_tabs_needs_ctrl() {
        let mut region = tabbed_region();
        let mut ctx = ctx();
        let pos = Point::new(200.0, 300.0);

        let plain = InputEvent::wheel(WheelDirection::Down, pos);
        assert_eq!(handle_region_event(&mut region, &mut ctx, &plain), HandlerResult::Continue);
        assert_eq!(region.category_active(), Some("A"));

        let ctrl = plain.with_modifiers(Modifiers::CTRL);
        handle_region_event(&mut region, &mut ctx, &ctrl);
        assert_eq!(region.category_active(), Some("B"));
    }

    #[test]
    fn test_ctrl_shift_tab_cycles_backwards() {
        let mut region = tabbed_region();
        let mut ctx = ctx();
        let event = InputEvent::key(KeyCode::Tab, Point::new(200.0, 300.0))
            .with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);

        handle_region_event(&mut region, &mut ctx, &event);
        assert_eq!(region.category_active(), Some("C"));
    }

    #[test]
    fn test_cycling_button_keeps_wheel() {
        let mut region = tabbed_region();
        region.active_button = Some(crate::model::ActiveButton {
            supports_cycling: true,
        });
        let mut ctx = ctx();
        let event = InputEvent::wheel(WheelDirection::Down, Point::new(200.0, 300.0))
            .with_modifiers(Modifiers::CTRL);

        assert_eq!(handle_region_event(&mut region, &mut ctx, &event), HandlerResult::Continue);
        assert_eq!(region.category_active(), Some("A"));
    }

    #[test]
    fn test_tab_click_activates_and_scrolls_to_top() {
        let mut region = tabbed_region();
        let mut ctx = ctx();
        let rect = region.categories[2].rect;
        let pos = Point::new(5.0, ((rect.ymin + rect.ymax) / 2) as f32);
        region.view.scroll_by(0.0, -50.0);

        let result = handle_region_event(&mut region, &mut ctx, &InputEvent::press(MouseButton::Left, pos));
        assert_eq!(result, HandlerResult::Break);
        assert_eq!(region.category_active(), Some("C"));
        assert_eq!(region.view.cur.ymax, region.view.tot.ymax);
    }
}
