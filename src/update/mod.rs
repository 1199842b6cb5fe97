//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

pub mod align;
pub mod interaction;
pub mod lifecycle;
pub mod region;

use crate::commands::Cmd;
use crate::messages::{EventKind, InputEvent, Msg};
use crate::model::{HandlerResult, ModalHandler, Region, RegionContext};

#[cfg(debug_assertions)]
use crate::tracing::LayoutSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use align::{align_step, need_realign, panel_real_size_y, panel_size_y, panels_scale, panels_size};
pub use interaction::{activate, handle_panel_event, panel_state, panel_type_context_poll, tick, TickResult};
pub use lifecycle::{
    add_instanced, add_instanced_by_name, collapse_all, custom_data_get, custom_data_set,
    free_instanced, layout_region, list_panel_unique_str, matches_search_filter,
    pack_expand_flag, panel_begin, panel_end, panels_begin, panels_end, set_expand_from_list_data,
    set_expansion_from_search_filter, sync_instanced, sync_list_data_expand_flags,
    tag_search_filter_match, unpack_expand_flag, ContentBuilder,
};
pub use region::{handle_panel_header, handle_region_event, HeaderTrigger};

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(region: &mut Region, ctx: &mut RegionContext, msg: Msg) -> Option<Cmd> {
    #[cfg(debug_assertions)]
    {
        update_traced(region, ctx, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(region, ctx, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(region: &mut Region, ctx: &mut RegionContext, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Input(event) => dispatch_input(region, ctx, &event),
        Msg::Tick => {
            tick(region, ctx);
        }
        Msg::SetActiveCategory(idname) => {
            region.category_active_set(&idname);
            ctx.tag_redraw();
        }
        Msg::ContentChanged => {
            region.content_changed = true;
            ctx.tag_redraw();
        }
    }

    ctx.take_cmd()
}

/// Offer an event to the modal handlers, newest first, then to the router
fn dispatch_input(region: &mut Region, ctx: &mut RegionContext, event: &InputEvent) {
    if event.kind == EventKind::PointerMove || matches!(event.kind, EventKind::Mouse(_)) {
        ctx.pointer = event.pos;
    }

    // Handlers added while handling this event only see the next one
    let handlers = region.handlers.clone();
    for handler in handlers.into_iter().rev() {
        if !region.handlers.contains(&handler) {
            continue;
        }
        let result = match handler {
            ModalHandler::Panel(id) => handle_panel_event(region, ctx, id, event),
            ModalHandler::DragCollapse {
                was_first_open,
                xy_init,
            } => region::handle_drag_collapse_event(region, ctx, was_first_open, xy_init, event),
        };
        if result == HandlerResult::Break {
            return;
        }
    }

    handle_region_event(region, ctx, event);
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after panel geometry and logs diffs for debugging.
/// Timer ticks are too frequent to get their own span.
#[cfg(debug_assertions)]
fn update_traced(region: &mut Region, ctx: &mut RegionContext, msg: Msg) -> Option<Cmd> {
    let is_noisy = matches!(&msg, Msg::Tick)
        || matches!(&msg, Msg::Input(e) if e.kind == EventKind::PointerMove);

    let msg_name = msg_type_name(&msg);
    let _span = if is_noisy {
        None
    } else {
        Some(span!(Level::DEBUG, "update", msg = %msg_name).entered())
    };

    let before = LayoutSnapshot::from_region(region);

    if !is_noisy {
        debug!(target: "message", msg = %msg_name, "processing");
    }

    let result = update_inner(region, ctx, msg);

    let after = LayoutSnapshot::from_region(region);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "layout", %diff, "state changed");
    }

    region.assert_invariants_with_context(&msg_name);

    result
}

/// Get a display name for a message type
///
/// Example outputs:
/// - `Input::Mouse(Left) Press`
/// - `SetActiveCategory("Tool")`
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    match msg {
        Msg::Input(e) => format!("Input::{:?} {:?}", e.kind, e.action),
        Msg::Tick => "Tick".to_string(),
        Msg::SetActiveCategory(c) => format!("SetActiveCategory({:?})", c),
        Msg::ContentChanged => "ContentChanged".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::config::PanelConfig;
    use crate::messages::MouseButton;
    use crate::model::{IRect, Panel, PanelState, PanelType, PanelTypeRegistry, Point};

    struct FixedHeight(i32);

    impl ContentBuilder for FixedHeight {
        fn build(&mut self, _: &PanelType, _: &Panel, _: i32) -> i32 {
            self.0
        }
    }

    fn two_panels() -> Region {
        let mut types = PanelTypeRegistry::new();
        types.register(PanelType::new("PT_a", "A"));
        types.register(PanelType::new("PT_b", "B"));
        let mut region = Region::new(types, PanelConfig::default(), IRect::new(0, 300, 0, 600));
        let mut ctx = RegionContext::new(Instant::now(), Point::default());
        layout_region(&mut region, &mut ctx, &mut FixedHeight(100));
        region
    }

    #[test]
    fn test_drag_by_handle_reorders_panels() {
        let mut region = two_panels();
        let (a, b) = (region.panels.roots()[0], region.panels.roots()[1]);
        let t0 = Instant::now();
        let mut ctx = RegionContext::new(t0, Point::default());

        // Grab A by its drag handle and pull it below B
        let grab = Point::new(290.0, 590.0);
        update(&mut region, &mut ctx, Msg::Input(InputEvent::press(MouseButton::Left, grab)));
        assert_eq!(panel_state(&region, a), PanelState::Dragging);

        let drop = Point::new(290.0, 300.0);
        update(&mut region, &mut ctx, Msg::Input(InputEvent::pointer_move(drop)));
        update(&mut region, &mut ctx, Msg::Input(InputEvent::release(MouseButton::Left, drop)));
        assert_eq!(panel_state(&region, a), PanelState::Animating);
        assert!(region.panels[b].sort_order < region.panels[a].sort_order);

        // Let the animation run out
        ctx.now = t0 + Duration::from_secs(1);
        update(&mut region, &mut ctx, Msg::Tick);
        assert_eq!(panel_state(&region, a), PanelState::Exiting);
        assert!(region.handlers.is_empty());
        assert_eq!(region.panels[b].top_edge(20), 0);
        assert_eq!(region.panels[a].top_edge(20), -120);
    }

    #[test]
    fn test_content_changed_requests_redraw() {
        let mut region = two_panels();
        let mut ctx = RegionContext::new(Instant::now(), Point::default());
        let cmd = update(&mut region, &mut ctx, Msg::ContentChanged);
        assert_eq!(cmd, Some(Cmd::Redraw));
        assert!(region.content_changed);
    }

    #[test]
    fn test_set_active_category_message() {
        let mut region = two_panels();
        region.category_add("Tool");
        region.category_add("View");
        let mut ctx = RegionContext::new(Instant::now(), Point::default());
        update(&mut region, &mut ctx, Msg::SetActiveCategory("View".into()));
        assert_eq!(region.category_active(), Some("View"));
    }
}
