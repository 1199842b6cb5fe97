//! Category tab strip geometry
//!
//! Tabs are stacked down the region's left edge (or right edge for
//! right-aligned regions) with rotated labels. Rectangles are in
//! region-relative pixels, y-up, and are recomputed on every draw.

use crate::model::{IRect, Region};

/// Padding between a tab's label and its ends
const TAB_PAD_TEXT: i32 = 5;
/// Gap between tabs
const TAB_PAD: i32 = 6;
/// Inset of the tab strip from the region edge
const TAB_INSET: i32 = 3;

/// Recompute every tab rectangle from measured label widths
///
/// When the stacked tabs are taller than the region they are scaled down
/// uniformly towards the top edge.
pub fn layout_category_tabs(region: &mut Region, measure: impl Fn(&str) -> i32) {
    let width = region.view.win_rect.width();
    let height = region.view.win_rect.height();
    let margin = region.config.category_margin;
    let on_left = region.category_tabs_on_left();

    let (xmin, xmax) = if on_left {
        (TAB_INSET, margin)
    } else {
        (width - margin, width - TAB_INSET)
    };

    let mut y_ofs = TAB_PAD;
    for tab in &mut region.categories {
        let text_width = measure(&tab.idname);
        tab.rect = IRect::new(
            xmin,
            xmax,
            height - (y_ofs + text_width + TAB_PAD_TEXT * 2),
            height - y_ofs,
        );
        y_ofs += text_width + TAB_PAD + TAB_PAD_TEXT * 2;
    }

    if y_ofs > height {
        let scale = height as f32 / y_ofs as f32;
        let squeeze = |y: i32| ((y - height) as f32 * scale + height as f32).round() as i32;
        for tab in &mut region.categories {
            tab.rect.ymin = squeeze(tab.rect.ymin);
            tab.rect.ymax = squeeze(tab.rect.ymax);
        }
    }

    // Tabs reach the region edge so clicks along it still land on them
    for tab in &mut region.categories {
        if on_left {
            tab.rect.xmin = 0;
        } else {
            tab.rect.xmax = width;
        }
    }
}

/// Whether a region-relative x coordinate is over the tab strip
pub fn over_tab_strip(region: &Region, x: i32) -> bool {
    let Some(first) = region.categories.first() else {
        return false;
    };
    if region.category_tabs_on_left() {
        x < first.rect.xmax
    } else {
        x > first.rect.xmin
    }
}
