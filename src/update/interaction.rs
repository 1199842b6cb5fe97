//! Per-panel interaction state machine: drag, resize and animation
//!
//! A panel with no `InteractionState` is idle. Entering any state other than
//! `Exiting` allocates the state, registers a `ModalHandler::Panel` and
//! restarts the repeating timer; `Exiting` tears all of that down again.

use std::time::Instant;

use crate::commands::{Cmd, Operator};
use crate::messages::{EventKind, InputEvent};
use crate::model::{
    HandlerResult, InteractionState, ModalHandler, PanelId, PanelState, PanelType, Point, Region,
    RegionContext, Snap, TimerHandle,
};

use super::align::align_step;

/// Set or clear `selected` on a panel and all of its descendants
///
/// Returns whether any flag changed.
pub(crate) fn set_selected_recursive(region: &mut Region, id: PanelId, value: bool) -> bool {
    let mut changed = false;
    for sub in region.panels.subtree(id) {
        let panel = &mut region.panels[sub];
        changed |= panel.flags.selected != value;
        panel.flags.selected = value;
    }
    changed
}

/// Set or clear `closed` on a panel and all of its descendants
pub(crate) fn set_closed_recursive(region: &mut Region, id: PanelId, value: bool) -> bool {
    let mut changed = false;
    for sub in region.panels.subtree(id) {
        let panel = &mut region.panels[sub];
        changed |= panel.flags.closed != value;
        panel.flags.closed = value;
    }
    changed
}

/// Current modal state of a panel, `Exiting` when idle
pub fn panel_state(region: &Region, id: PanelId) -> PanelState {
    region
        .panels
        .get(id)
        .and_then(|p| p.interaction.as_ref())
        .map_or(PanelState::Exiting, |s| s.state)
}

/// Move a panel into `state`
///
/// No-op when the panel is already there (idle counts as `Exiting`).
pub fn activate(region: &mut Region, ctx: &mut RegionContext, id: PanelId, state: PanelState) {
    if !region.panels.contains(id) || panel_state(region, id) == state {
        return;
    }

    let was_drag_drop = panel_state(region, id) == PanelState::Dragging;

    // Sub-panels are selected too so they draw above their dragged parent
    match state {
        PanelState::Exiting | PanelState::Animating => {
            set_selected_recursive(region, id, false);
        }
        _ => {
            set_selected_recursive(region, id, true);
        }
    }

    if let Some(data) = region.panels[id].interaction.as_mut() {
        data.timer = None;
    }

    tracing::debug!(panel = %region.panels[id].name, ?state, "panel state");

    if state == PanelState::Exiting {
        region.panels[id].interaction = None;
        region.handlers.retain(|h| h.panel() != Some(id));
        ctx.tag_redraw();
        return;
    }

    if region.panels[id].interaction.is_none() {
        region.panels[id].interaction = Some(InteractionState::new(state, ctx.now));
        region.handlers.push(ModalHandler::Panel(id));
    }

    if state.is_timed() {
        let interval = region.config.timer_interval();
        if let Some(data) = region.panels[id].interaction.as_mut() {
            data.timer = Some(TimerHandle::start(ctx.now, interval));
        }
    }

    // Lets the host scroll the region while the pointer rests near an edge
    if state == PanelState::Dragging {
        ctx.emit(Cmd::InvokeOperator(Operator::EdgePan));
    }

    let (cur_xmin, cur_ymin) = (region.view.cur.xmin, region.view.cur.ymin);
    let panel = &mut region.panels[id];
    let (ofs, size) = ((panel.ofs_x, panel.ofs_y), (panel.size_x, panel.size_y));
    if let Some(data) = panel.interaction.as_mut() {
        data.state = state;
        data.start_pointer = ctx.pointer;
        data.start_ofs = ofs;
        data.start_size = size;
        data.start_cur_xmin = cur_xmin;
        data.start_cur_ymin = cur_ymin;
        data.start_time = ctx.now;
        data.is_drag_drop = was_drag_drop || state == PanelState::Dragging;
    }

    ctx.tag_redraw();
}

/// Apply the pointer position to a dragged or resized panel
pub fn do_drag(region: &mut Region, ctx: &mut RegionContext, id: PanelId, pointer: Point) {
    let Some(data) = region.panels.get(id).and_then(|p| p.interaction.clone()) else {
        return;
    };

    // Keep the panel reachable: allow the pointer a little past the top and right
    let win = region.view.win_rect;
    let pad = region.config.header_height as f32 * 0.5;
    let x = pointer.x.round().clamp(win.xmin as f32, win.xmax as f32 + pad);
    let y = pointer.y.round().clamp(win.ymin as f32, win.ymax as f32 + pad);

    let (zoom_x, zoom_y) = region.view.zoom_factors();
    let mut dx = (x - data.start_pointer.x.round()) * zoom_x;
    let mut dy = (y - data.start_pointer.y.round()) * zoom_y;

    if data.state == PanelState::DraggingResize {
        let (min_w, min_h) = (region.config.min_width, region.config.min_height);
        let (start_w, start_h) = (data.start_size.0 as f32, data.start_size.1 as f32);
        if start_h - dy < min_h as f32 {
            dy = start_h - min_h as f32;
        }

        let panel = &mut region.panels[id];
        panel.size_x = ((start_w + dx) as i32).max(min_w);
        panel.size_y = (start_h - dy) as i32;
        panel.ofs_y = data.start_ofs.1 + dy as i32;
    } else {
        dx += region.view.cur.xmin - data.start_cur_xmin;
        dy += region.view.cur.ymin - data.start_cur_ymin;

        let panel = &mut region.panels[id];
        panel.snap = Snap::None;
        panel.ofs_x = data.start_ofs.0 + dx.round() as i32;
        panel.ofs_y = data.start_ofs.1 + dy.round() as i32;

        let factor = region.config.drag_align_factor;
        align_step(region, factor, true);
    }

    ctx.tag_redraw();
}

/// Advance an animating panel one timer tick
pub fn do_animate(region: &mut Region, ctx: &mut RegionContext, id: PanelId) {
    let Some(data) = region.panels.get(id).and_then(|p| p.interaction.as_ref()) else {
        return;
    };
    let is_drag_drop = data.is_drag_drop;

    let elapsed = ctx.now.saturating_duration_since(data.start_time);
    let duration = region.config.animation_time().as_secs_f32().max(f32::EPSILON);
    let mut fac = (elapsed.as_secs_f32() / duration).sqrt().min(1.0);

    if align_step(region, fac, false) {
        ctx.tag_redraw();
    } else {
        fac = 1.0;
    }

    if fac >= 1.0 {
        activate(region, ctx, id, PanelState::Exiting);
        if is_drag_drop {
            reorder_instanced_panel_list(region, id);
        }
    }
}

/// Whether a panel type belongs to the same group as the one being compared
///
/// With visible tabs, types group by the active category; otherwise by a
/// non-empty context string.
pub fn panel_type_context_poll(region: &Region, panel_type: &PanelType, context: Option<&str>) -> bool {
    if region.categories_visible() {
        return region.category_active() == Some(panel_type.category.as_str());
    }
    !panel_type.context.is_empty() && Some(panel_type.context.as_str()) == context
}

/// Report a dropped instanced panel's new list index to its type
fn reorder_instanced_panel_list(region: &mut Region, drag: PanelId) {
    let Some(panel_type) = region.panel_type(drag) else {
        return;
    };
    let Some(reorder) = panel_type.callbacks.reorder else {
        return;
    };

    let context = if region.categories_visible() {
        None
    } else {
        Some(panel_type.context.clone())
    };

    let mut list: Vec<PanelId> = region
        .panels
        .roots()
        .iter()
        .copied()
        .filter(|&id| {
            region
                .panel_type(id)
                .is_some_and(|t| t.flags.instanced && panel_type_context_poll(region, t, context.as_deref()))
        })
        .collect();
    list.sort_by_key(|&id| region.panels[id].sort_order);

    let move_to_index = list.iter().position(|&id| id == drag).unwrap_or(list.len());

    region.panels[drag].flags.list_order_changed = true;
    tracing::debug!(panel = %region.panels[drag].name, move_to_index, "reorder instanced list");
    reorder(&region.panels[drag], move_to_index);
}

/// Modal handler for a panel with live interaction state
///
/// Never swallows events while animating.
pub fn handle_panel_event(
    region: &mut Region,
    ctx: &mut RegionContext,
    id: PanelId,
    event: &InputEvent,
) -> HandlerResult {
    let state = panel_state(region, id);

    if event.is_left_release() {
        activate(region, ctx, id, PanelState::Animating);
    } else if event.kind == EventKind::PointerMove && state.is_drag() {
        do_drag(region, ctx, id, event.pos);
    }

    if panel_state(region, id) == PanelState::Animating {
        HandlerResult::Continue
    } else {
        HandlerResult::Break
    }
}

/// Outcome of firing due timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickResult {
    /// Some panel still has a live timer
    pub still_running: bool,
    /// Something moved and the region should be redrawn
    pub redraw: bool,
}

/// Fire every due drag or animation timer
pub fn tick(region: &mut Region, ctx: &mut RegionContext) -> TickResult {
    let now: Instant = ctx.now;
    let due: Vec<PanelId> = region
        .panels
        .all()
        .into_iter()
        .filter(|&id| {
            region.panels[id]
                .interaction
                .as_ref()
                .and_then(|s| s.timer)
                .is_some_and(|t| t.is_due(now))
        })
        .collect();

    let mut redraw = false;
    for id in due {
        let Some(data) = region.panels.get_mut(id).and_then(|p| p.interaction.as_mut()) else {
            // Deleted or exited by an earlier timer this tick
            continue;
        };
        if let Some(timer) = data.timer.as_mut() {
            timer.rearm(now);
        }

        let state = data.state;

        let before = ctx.take_cmd();
        match state {
            PanelState::Animating => do_animate(region, ctx, id),
            PanelState::Dragging | PanelState::DraggingResize => {
                let pointer = ctx.pointer;
                do_drag(region, ctx, id, pointer);
            }
            PanelState::WaitingForUntab | PanelState::Exiting => {}
        }
        let after = ctx.take_cmd();
        redraw |= after.as_ref().is_some_and(Cmd::needs_redraw);
        for cmd in [before, after].into_iter().flatten() {
            ctx.emit(cmd);
        }
    }

    TickResult {
        still_running: region.next_timer_deadline().is_some(),
        redraw,
    }
}
