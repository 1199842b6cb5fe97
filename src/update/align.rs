//! Layout solver: size accounting and whole-region positioning
//!
//! Offsets are region-local and y-up. A panel's `ofs_y` is the bottom of its
//! content area; the header sits on top of the content.

use std::cmp::Ordering;

use crate::model::{PanelId, PanelState, Region};

/// Height including the header, counting content even when closed
pub fn panel_size_y(region: &Region, id: PanelId) -> i32 {
    region.panels[id].size_y + region.header_height_of(id)
}

/// Height actually occupied on screen: header plus content if open
pub fn panel_real_size_y(region: &Region, id: PanelId) -> i32 {
    let panel = &region.panels[id];
    let size_y = if panel.flags.closed { 0 } else { panel.size_y };
    size_y + region.header_height_of(id)
}

/// Horizontal space reserved for category tabs on the left edge
pub fn region_offset_x(region: &Region) -> i32 {
    if region.categories_visible() && region.category_tabs_on_left() {
        region.config.category_margin
    } else {
        0
    }
}

fn interpolate(target: i32, current: i32, factor: f32) -> i32 {
    (factor * target as f32 + (1.0 - factor) * current as f32).round() as i32
}

/// Active top-level panels, in list order
pub fn active_top_level(region: &Region) -> Vec<PanelId> {
    region
        .panels
        .roots()
        .iter()
        .copied()
        .filter(|&id| region.panels[id].runtime.active)
        .collect()
}

/// Visual order while dragging: headerless panels first, then by bottom
/// edge descending, then by sort order
fn compare_by_position(region: &Region, a: PanelId, b: PanelId) -> Ordering {
    let (pa, pb) = (&region.panels[a], &region.panels[b]);
    let (a_headerless, b_headerless) = (!region.has_header(a), !region.has_header(b));
    if a_headerless != b_headerless {
        return if a_headerless {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    (pb.ofs_y + pb.size_y)
        .cmp(&(pa.ofs_y + pa.size_y))
        .then(pa.sort_order.cmp(&pb.sort_order))
}

/// Move every active top-level panel a fraction of the way to its target
///
/// With `drag`, panels are ordered by where they currently are and their
/// sort orders are rewritten to match. Selected (dragged) panels are left
/// where the pointer put them. Returns whether any offset changed.
pub fn align_step(region: &mut Region, factor: f32, drag: bool) -> bool {
    let mut order = active_top_level(region);
    debug_assert!(
        order.iter().all(|&id| region.panels[id].type_id.is_some()),
        "active panels must have a type"
    );
    order.retain(|&id| region.panels[id].type_id.is_some());
    if order.is_empty() {
        return false;
    }

    if drag {
        let view: &Region = region;
        order.sort_by(|&a, &b| compare_by_position(view, a, b));
        for (i, &id) in order.iter().enumerate() {
            region.panels[id].sort_order = i as i32;
        }
    } else {
        order.sort_by_key(|&id| region.panels[id].sort_order);
    }

    let offset_x = region_offset_x(region);
    let box_margin = region.config.box_margin;

    let mut targets = Vec::with_capacity(order.len());
    let mut y = 0;
    for &id in &order {
        let use_box = region.panel_type(id).is_some_and(|t| t.flags.draw_box);
        let margin = if use_box { box_margin } else { 0 };

        y -= panel_real_size_y(region, id);
        y -= margin;

        let panel = &mut region.panels[id];
        panel.region_ofs_x = offset_x;
        let mut target_y = y;
        // Closed panels keep their open size; the header still draws above it
        if panel.flags.closed {
            target_y -= panel.size_y;
        }
        targets.push((id, offset_x + margin, target_y));
    }

    let mut changed = false;
    for (id, target_x, target_y) in targets {
        let panel = &mut region.panels[id];
        if panel.flags.selected {
            continue;
        }
        if panel.ofs_x != target_x {
            panel.ofs_x = interpolate(target_x, panel.ofs_x, factor);
            changed = true;
        }
        if panel.ofs_y != target_y {
            panel.ofs_y = interpolate(target_y, panel.ofs_y, factor);
            changed = true;
        }
    }

    for id in active_top_level(region) {
        align_sub_panels(region, id);
    }

    tracing::trace!(factor, drag, changed, "align step");
    changed
}

/// Stack active children directly under the parent's own content
fn align_sub_panels(region: &mut Region, id: PanelId) {
    let parent = &region.panels[id];
    let ofs_x = parent.ofs_x;
    let mut cursor = parent.ofs_y + parent.size_y - parent.block_size_y;
    let children = parent.children.clone();

    for child in children {
        if !region.panels[child].runtime.active {
            continue;
        }
        let size_y = panel_size_y(region, child);
        let real_size_y = panel_real_size_y(region, child);

        let panel = &mut region.panels[child];
        panel.ofs_x = ofs_x;
        panel.ofs_y = cursor - size_y;
        cursor -= real_size_y;

        if !panel.children.is_empty() {
            align_sub_panels(region, child);
        }
    }
}

#[derive(Debug, Default)]
struct AnimationScan {
    candidate: Option<PanelId>,
    no_animation: bool,
}

/// Detect active-state changes; also picks the panel that should drive an
/// animated realign
fn active_animation_changed(region: &Region, list: &[PanelId], scan: &mut AnimationScan) -> bool {
    for &id in list {
        let panel = &region.panels[id];

        if !region.is_subpanel(id) && panel.runtime.was_active != panel.runtime.active {
            return true;
        }

        if panel.runtime.active
            && !panel.flags.closed
            && active_animation_changed(region, &panel.children, scan)
        {
            return true;
        }

        if let Some(state) = &panel.interaction {
            if state.state == PanelState::Animating {
                scan.candidate = Some(id);
            } else {
                // Never animate while another interaction is running
                scan.no_animation = true;
            }
        }
        if panel.runtime.anim_align && scan.candidate.is_none() {
            scan.candidate = Some(id);
        }
    }
    false
}

/// Whether the region needs realigning, and which panel should animate it
///
/// `(true, None)` means snap immediately.
pub fn need_realign(region: &Region) -> (bool, Option<PanelId>) {
    if region.content_changed {
        return (true, None);
    }

    let mut scan = AnimationScan::default();
    if active_animation_changed(region, region.panels.roots(), &mut scan) {
        return (true, None);
    }

    match scan.candidate {
        Some(id) if !scan.no_animation => (true, Some(id)),
        Some(_) => (true, None),
        None => (false, None),
    }
}

/// Extent of the active panels: (max right edge, min bottom edge)
///
/// An empty region reports the default panel width on both axes.
pub fn panels_size(region: &Region) -> (i32, i32) {
    let mut size_x = 0;
    let mut size_y = 0;
    for id in active_top_level(region) {
        let panel = &region.panels[id];
        size_x = size_x.max(panel.ofs_x + panel.size_x);
        size_y = size_y.min(panel.real_ofs_y());
    }

    if size_x == 0 {
        size_x = region.config.default_width;
    }
    if size_y == 0 {
        size_y = -region.config.default_width;
    }
    (size_x, size_y)
}

/// Force the width of every laid out panel
pub fn panels_scale(region: &mut Region, new_width: i32) {
    let blocks = region.blocks.clone();
    for id in blocks {
        if let Some(panel) = region.panels.get_mut(id) {
            panel.size_x = new_width;
        }
    }
}
