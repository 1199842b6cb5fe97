//! Panel lifecycle: layout passes, instanced panels, expansion flags,
//! search filtering and custom data

use crate::model::{
    CustomData, ListData, Panel, PanelId, PanelState, PanelType, PanelTypeId, Rect, Region,
    RegionContext,
};

use super::align::{align_step, need_realign, panel_real_size_y, panels_size, region_offset_x};
use super::interaction::activate;

// ============================================================================
// Layout pass
// ============================================================================

/// Start a layout pass: every panel becomes inactive until it is begun again
pub fn panels_begin(region: &mut Region) {
    for id in region.panels.all() {
        region.panels[id].runtime.begin_pass();
    }
    region.blocks.clear();
}

/// Look up or create the panel for `type_id` and mark it active
///
/// `existing` should come from `PanelTree::find_by_name` (or be an instanced
/// panel). Returns the panel and whether its content should be built.
pub fn panel_begin(
    region: &mut Region,
    parent: Option<PanelId>,
    type_id: PanelTypeId,
    existing: Option<PanelId>,
) -> (PanelId, bool) {
    let panel_type = &region.types[type_id];
    let (idname, label) = (panel_type.idname.clone(), panel_type.label.clone());
    let (no_header, default_closed) = (panel_type.flags.no_header, panel_type.flags.default_closed);

    let existing = existing.filter(|&id| region.panels.contains(id));
    let is_new = existing.is_none();
    let id = match existing {
        Some(id) => {
            region.panels[id].type_id = Some(type_id);
            id
        }
        None => {
            let mut panel = Panel::new(type_id, idname);
            panel.flags.closed = default_closed;
            panel.runtime.new_added = true;
            region.panels.insert(panel, parent)
        }
    };

    // A closed headerless panel could never be opened again
    let panel = &mut region.panels[id];
    if no_header && panel.flags.closed {
        panel.flags.closed = false;
        panel.size_x = 0;
        panel.size_y = 0;
        panel.block_size_x = 0;
        panel.block_size_y = 0;
    }
    panel.draw_name = label;

    let parent = panel.parent;
    let last = region
        .panels
        .siblings(parent)
        .iter()
        .copied()
        .find(|&p| region.panels[p].runtime.last_added);
    if let Some(last) = last {
        region.panels.move_after(id, last);
    }

    if is_new {
        let sort_order = last.map_or(0, |l| region.panels[l].sort_order + 1);
        region.panels[id].sort_order = sort_order;
        for sibling in region.panels.siblings(parent).to_vec() {
            let panel = &mut region.panels[sibling];
            if sibling != id && panel.sort_order >= sort_order {
                panel.sort_order += 1;
            }
        }
        tracing::debug!(panel = %region.panels[id].name, sort_order, "panel added");
    }

    if let Some(last) = last {
        region.panels[last].runtime.last_added = false;
    }

    let panel = &mut region.panels[id];
    panel.runtime.active = true;
    panel.runtime.last_added = true;
    region.blocks.push(id);

    (id, !panel.flags.closed)
}

/// Record the measured content size of a panel begun this pass
///
/// `width`/`height` cover the panel's own content; active sub-panels are
/// added on top. Size changes keep the top edge in place and request an
/// animated realign.
pub fn panel_end(region: &mut Region, id: PanelId, width: i32, height: i32, open: bool) {
    let mut total_w = width;
    let mut total_h = height;
    for &child in region.panels.children(id) {
        if region.panels[child].runtime.active {
            total_w = total_w.max(region.panels[child].size_x);
            total_h += panel_real_size_y(region, child);
        }
    }
    let region_ofs_x = region_offset_x(region);

    let panel = &mut region.panels[id];
    panel.block_size_x = width;
    panel.block_size_y = height;

    if panel.runtime.new_added {
        panel.runtime.new_added = false;
        panel.size_x = total_w;
        panel.size_y = total_h;
        return;
    }

    let (old_w, old_h) = (panel.size_x, panel.size_y);
    let old_region_ofs_x = panel.region_ofs_x;

    // Zero means the content was skipped this pass
    if total_w != 0 {
        panel.size_x = total_w;
    }
    if total_h != 0 || open {
        panel.size_y = total_h;
    }

    if panel.size_x != old_w || panel.size_y != old_h {
        panel.runtime.anim_align = true;
        panel.ofs_y += old_h - panel.size_y;
    }

    panel.region_ofs_x = region_ofs_x;
    if old_region_ofs_x != region_ofs_x {
        panel.runtime.anim_align = true;
    }
}

/// Finish a layout pass and realign
///
/// Returns the extent of the panels, which also becomes the view's total rect.
pub fn panels_end(region: &mut Region, ctx: &mut RegionContext) -> (i32, i32) {
    region_set_expansion_from_list_data(region, ctx);

    if region.search_filter.update {
        // The update from clearing the search would leave every panel closed
        if region.search_filter.active {
            set_expansion_from_search_filter(region, ctx);
            sync_list_data_expand_flags(region);
        }
        region.search_filter.update = false;
    }

    let (realign, animate) = need_realign(region);
    region.content_changed = false;
    if realign {
        match animate {
            Some(id) => activate(region, ctx, id, PanelState::Animating),
            None => {
                align_step(region, 1.0, false);
            }
        }
    }

    let (x, y) = panels_size(region);
    region.view.tot = Rect::new(0.0, x as f32, y as f32, 0.0);
    (x, y)
}

// ============================================================================
// Instanced panels
// ============================================================================

/// Add an instanced panel (and its sub-panels) at the end of the list
pub fn add_instanced(
    region: &mut Region,
    type_id: PanelTypeId,
    custom_data: Option<CustomData>,
) -> PanelId {
    add_instanced_in(region, None, type_id, custom_data)
}

fn add_instanced_in(
    region: &mut Region,
    parent: Option<PanelId>,
    type_id: PanelTypeId,
    custom_data: Option<CustomData>,
) -> PanelId {
    // Appended after every existing panel in display order
    let max_sort_order = region
        .panels
        .siblings(parent)
        .iter()
        .map(|&id| region.panels[id].sort_order)
        .fold(0, i32::max);

    let panel_type = &region.types[type_id];
    let children = panel_type.children.clone();
    let mut panel = Panel::new(type_id, panel_type.idname.clone());
    panel.custom_data = custom_data.clone();
    panel.runtime.new_added = true;
    panel.sort_order = max_sort_order + 1;

    let id = region.panels.insert(panel, parent);
    for child in children {
        add_instanced_in(region, Some(id), child, custom_data.clone());
    }
    id
}

/// Add an instanced panel by type idname
pub fn add_instanced_by_name(
    region: &mut Region,
    idname: &str,
    custom_data: Option<CustomData>,
) -> Option<PanelId> {
    let Some(type_id) = region.types.find(idname) else {
        tracing::warn!("Panel type '{}' not found", idname);
        return None;
    };
    Some(add_instanced(region, type_id, custom_data))
}

/// Suffix that tells apart instanced panels of the same type
///
/// Sort orders are unique because the list is rebuilt whenever its data
/// changes order or length.
pub fn list_panel_unique_str(panel: &Panel) -> String {
    panel.sort_order.to_string()
}

/// Delete a panel and its sub-panels, dropping any interaction first
fn delete_panel(region: &mut Region, ctx: Option<&mut RegionContext>, id: PanelId) {
    if let Some(ctx) = ctx {
        if region.panels[id].interaction.is_some() {
            activate(region, ctx, id, PanelState::Exiting);
        }
    }

    let subtree = region.panels.subtree(id);
    region
        .handlers
        .retain(|h| !h.panel().is_some_and(|p| subtree.contains(&p)));
    region.blocks.retain(|b| !subtree.contains(b));

    let removed = region.panels.delete(id);
    tracing::debug!(count = removed.len(), "deleted panels");
}

/// Remove every instanced panel from the region
///
/// With a context, live interactions exit properly (and request a redraw);
/// without one their handlers are still purged.
pub fn free_instanced(region: &mut Region, mut ctx: Option<&mut RegionContext>) {
    let instanced: Vec<PanelId> = region
        .panels
        .roots()
        .iter()
        .copied()
        .filter(|&id| region.panel_type(id).is_some_and(|t| t.flags.instanced))
        .collect();

    for id in instanced {
        delete_panel(region, ctx.as_deref_mut(), id);
    }
}

/// Rebuild the instanced panels if they no longer mirror `data`
///
/// `make_custom_data` is called with each item's index. Returns whether
/// the list was rebuilt.
pub fn sync_instanced<L, F>(
    region: &mut Region,
    ctx: Option<&mut RegionContext>,
    data: &L,
    mut make_custom_data: F,
) -> bool
where
    L: ListData,
    F: FnMut(usize) -> Option<CustomData>,
{
    if region.panels.matches_list_data(&region.types, Some(data)) {
        return false;
    }

    free_instanced(region, ctx);
    for i in 0..data.count() {
        add_instanced_by_name(region, data.identifier_at(i), make_custom_data(i));
    }
    true
}

// ============================================================================
// Expansion flags
// ============================================================================

/// Open/closed state of a panel and its descendants, depth first
///
/// Bit `i` is set when the `i`-th visited panel is open. Panels past the
/// 32nd are not recorded.
pub fn pack_expand_flag(region: &Region, id: PanelId) -> u32 {
    region
        .panels
        .subtree(id)
        .into_iter()
        .enumerate()
        .filter(|&(_, sub)| !region.panels[sub].flags.closed)
        .fold(0, |flag, (i, _)| flag | 1u32.checked_shl(i as u32).unwrap_or(0))
}

/// Apply a packed expansion bitfield; returns whether any panel changed
pub fn unpack_expand_flag(region: &mut Region, id: PanelId, flag: u32) -> bool {
    let mut changed = false;
    for (i, sub) in region.panels.subtree(id).into_iter().enumerate() {
        let Some(bit) = 1u32.checked_shl(i as u32) else {
            break;
        };
        let closed = flag & bit == 0;
        let panel = &mut region.panels[sub];
        changed |= panel.flags.closed != closed;
        panel.flags.closed = closed;
    }
    changed
}

/// Load expansion from the list item behind an instanced panel
pub fn set_expand_from_list_data(region: &mut Region, ctx: &mut RegionContext, id: PanelId) {
    let Some(panel_type) = region.panel_type(id) else {
        return;
    };
    debug_assert!(panel_type.flags.instanced);
    let Some(get_flag) = panel_type.callbacks.get_list_data_expand_flag else {
        return;
    };

    let flag = get_flag(&region.panels[id]);
    if unpack_expand_flag(region, id, flag) {
        activate(region, ctx, id, PanelState::Animating);
    }
}

fn region_set_expansion_from_list_data(region: &mut Region, ctx: &mut RegionContext) {
    let roots = region.panels.roots().to_vec();
    for id in roots {
        if region.panel_type(id).is_some_and(|t| t.flags.instanced) {
            set_expand_from_list_data(region, ctx, id);
        }
    }
}

/// Store every active instanced panel's expansion back into its list item
pub fn sync_list_data_expand_flags(region: &Region) {
    for &id in region.panels.roots() {
        let Some(panel_type) = region.panel_type(id) else {
            continue;
        };
        if !panel_type.flags.instanced || !region.panels[id].runtime.active {
            continue;
        }
        if let Some(set_flag) = panel_type.callbacks.set_list_data_expand_flag {
            set_flag(&region.panels[id], pack_expand_flag(region, id));
        }
    }
}

/// Close every top-level panel grouped with `from`
///
/// Grouping follows the context string, and the active category when tabs
/// are shown (pinned panels count as part of every category).
pub fn collapse_all(region: &mut Region, from: PanelId) {
    let category = if region.categories_visible() {
        region.category_active().map(str::to_string)
    } else {
        None
    };
    let Some(from_context) = region.panel_type(from).map(|t| t.context.clone()) else {
        return;
    };

    for id in region.panels.roots().to_vec() {
        let Some(panel_type) = region.panel_type(id) else {
            continue;
        };
        if panel_type.flags.no_header {
            continue;
        }
        let same_context = panel_type.context.is_empty()
            || from_context.is_empty()
            || panel_type.context == from_context;
        let same_category = category.is_none()
            || panel_type.category.is_empty()
            || category.as_deref() == Some(panel_type.category.as_str());

        let panel = &mut region.panels[id];
        if same_context && (panel.flags.pinned || same_category) {
            panel.flags.closed = true;
        }
    }
}

// ============================================================================
// Search filter
// ============================================================================

/// Mark a panel as containing a property that matches the search
pub fn tag_search_filter_match(region: &mut Region, id: PanelId) {
    if let Some(panel) = region.panels.get_mut(id) {
        panel.runtime.search_match = true;
    }
}

/// Whether the panel or any sub-panel matches the search
pub fn matches_search_filter(region: &Region, id: PanelId) -> bool {
    region
        .panels
        .subtree(id)
        .into_iter()
        .any(|sub| region.panels[sub].runtime.search_match)
}

fn set_expansion_from_search_filter_recursive(
    region: &mut Region,
    ctx: &mut RegionContext,
    id: PanelId,
) {
    let closed = !matches_search_filter(region, id);
    if region.panels[id].flags.closed != closed {
        region.panels[id].flags.closed = closed;
        activate(region, ctx, id, PanelState::Animating);
    }

    if region.panels[id].runtime.active && region.has_header(id) {
        for child in region.panels.children(id).to_vec() {
            set_expansion_from_search_filter_recursive(region, ctx, child);
        }
    }
}

/// Open panels with search matches and close the rest
pub fn set_expansion_from_search_filter(region: &mut Region, ctx: &mut RegionContext) {
    for id in region.panels.roots().to_vec() {
        if region.panels[id].runtime.active && region.has_header(id) {
            set_expansion_from_search_filter_recursive(region, ctx, id);
        }
    }
}

// ============================================================================
// Custom data
// ============================================================================

/// Replace the custom data of a panel and all of its sub-panels
///
/// The previous data is released once the last panel lets go of it.
pub fn custom_data_set(region: &mut Region, id: PanelId, data: Option<CustomData>) {
    debug_assert!(region.panel_type(id).is_some());
    for sub in region.panels.subtree(id) {
        region.panels[sub].custom_data = data.clone();
    }
}

pub fn custom_data_get(region: &Region, id: PanelId) -> Option<&CustomData> {
    region.panels.get(id).and_then(Panel::custom_data)
}

// ============================================================================
// Region layout driver
// ============================================================================

/// Builds panel content during a layout pass
pub trait ContentBuilder {
    /// Whether a panel of this type should be shown at all
    fn poll(&mut self, _panel_type: &PanelType) -> bool {
        true
    }

    /// Lay out the panel's own content and return its height
    fn build(&mut self, panel_type: &PanelType, panel: &Panel, width: i32) -> i32;

    /// Whether the content contains something matching the search string
    fn matches_search(&mut self, _panel_type: &PanelType, _panel: &Panel) -> bool {
        false
    }
}

fn context_matches(region: &Region, panel_type: &PanelType) -> bool {
    match region.context.as_deref() {
        Some(context) => panel_type.context.is_empty() || panel_type.context == context,
        None => true,
    }
}

fn draw_panel<B: ContentBuilder + ?Sized>(
    region: &mut Region,
    builder: &mut B,
    parent: Option<PanelId>,
    type_id: PanelTypeId,
    existing: Option<PanelId>,
    width: i32,
) {
    let (id, open) = panel_begin(region, parent, type_id, existing);
    let search_active = region.search_filter.active;

    let mut height = 0;
    if open || search_active {
        let (panel_type, panel) = (&region.types[type_id], &region.panels[id]);
        height = builder.build(panel_type, panel, width);
        if search_active && builder.matches_search(panel_type, panel) {
            tag_search_filter_match(region, id);
        }

        for child_type in region.types[type_id].children.clone() {
            if !builder.poll(&region.types[child_type]) {
                continue;
            }
            let child = region
                .panels
                .find_by_name(Some(id), &region.types[child_type].idname);
            draw_panel(region, builder, Some(id), child_type, child, width);
        }
    }

    panel_end(region, id, width, height, open);
}

/// Run a full layout pass over every panel type of the region
///
/// Returns the panel extent, as `panels_end` does.
pub fn layout_region<B: ContentBuilder + ?Sized>(
    region: &mut Region,
    ctx: &mut RegionContext,
    builder: &mut B,
) -> (i32, i32) {
    let types: Vec<PanelTypeId> = region
        .types
        .top_level()
        .filter(|(_, t)| context_matches(region, t))
        .map(|(id, _)| id)
        .collect();
    let types: Vec<PanelTypeId> = types
        .into_iter()
        .filter(|&t| builder.poll(&region.types[t]))
        .collect();

    region.category_clear_all();
    for &t in &types {
        let category = region.types[t].category.clone();
        if !category.is_empty() && region.category_find(&category).is_none() {
            region.category_add(&category);
        }
    }
    let category = if region.categories_visible() {
        region.category_active_get(true)
    } else {
        None
    };
    let in_category = |panel_type: &PanelType| match &category {
        Some(active) => panel_type.category.is_empty() || &panel_type.category == active,
        None => true,
    };

    let width = region.view.win_rect.width() - region_offset_x(region);
    let box_width = width - region.config.box_margin * 2;
    let width_for = |panel_type: &PanelType| {
        if panel_type.flags.draw_box {
            box_width
        } else {
            width
        }
    };

    panels_begin(region);

    for &t in &types {
        let panel_type = &region.types[t];
        if panel_type.flags.instanced {
            continue;
        }
        let existing = region.panels.find_by_name(None, &panel_type.idname);
        let pinned = existing.is_some_and(|id| region.panels[id].flags.pinned);
        if !in_category(panel_type) && !pinned {
            continue;
        }
        let w = width_for(panel_type);
        draw_panel(region, builder, None, t, existing, w);
    }

    let instanced: Vec<PanelId> = region
        .panels
        .roots()
        .iter()
        .copied()
        .filter(|&id| {
            region
                .panel_type(id)
                .is_some_and(|t| t.flags.instanced && in_category(t))
        })
        .collect();
    for id in instanced {
        let Some(type_id) = region.panels[id].type_id else {
            continue;
        };
        let w = width_for(&region.types[type_id]);
        draw_panel(region, builder, None, type_id, Some(id), w);
    }

    panels_end(region, ctx)
}
