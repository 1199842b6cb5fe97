//! Geometry primitives shared by layout, hit-testing and drawing
//!
//! Region-local view space is y-up: panels stack downward from `y = 0`, so
//! offsets of lower panels are negative. Window space is the host's pixel
//! space in which input events arrive.

use serde::{Deserialize, Serialize};

/// A point in window or view coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Floating point rectangle stored as min/max edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
}

impl Rect {
    pub const fn new(xmin: f32, xmax: f32, ymin: f32, ymax: f32) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    /// Inclusive containment test (edges count as inside)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Scale the rectangle around its center
    pub fn scaled(&self, factor: f32) -> Rect {
        let cx = (self.xmin + self.xmax) * 0.5;
        let cy = (self.ymin + self.ymax) * 0.5;
        let hw = self.width() * 0.5 * factor;
        let hh = self.height() * 0.5 * factor;
        Rect::new(cx - hw, cx + hw, cy - hh, cy + hh)
    }

    /// Whether the segment `a -> b` touches this rectangle
    ///
    /// True when either endpoint lies inside, or the segment crosses one of
    /// the rectangle's diagonals.
    pub fn intersects_segment(&self, a: Point, b: Point) -> bool {
        if self.contains(a) || self.contains(b) {
            return true;
        }

        let diagonals = [
            (
                Point::new(self.xmin, self.ymin),
                Point::new(self.xmax, self.ymax),
            ),
            (
                Point::new(self.xmin, self.ymax),
                Point::new(self.xmax, self.ymin),
            ),
        ];
        diagonals
            .iter()
            .any(|&(c, d)| segments_intersect(a, b, c, d))
    }
}

/// Integer rectangle, used for window-space region bounds and tab strips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IRect {
    pub xmin: i32,
    pub xmax: i32,
    pub ymin: i32,
    pub ymax: i32,
}

impl IRect {
    pub const fn new(xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    pub fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.xmin as f32,
            self.xmax as f32,
            self.ymin as f32,
            self.ymax as f32,
        )
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(c, d, a))
        || (d2 == 0.0 && on_segment(c, d, b))
        || (d3 == 0.0 && on_segment(a, b, c))
        || (d4 == 0.0 && on_segment(a, b, d))
}

/// The region's 2D view: where it sits in the window and which part of view
/// space is visible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionView {
    /// Region bounds in window pixels
    pub win_rect: IRect,
    /// Visible rectangle in view space
    pub cur: Rect,
    /// Total extent of the content, updated after every layout pass
    pub tot: Rect,
    /// Scrollbar rectangles in window pixels; they take input priority
    #[serde(default)]
    pub scrollers: Vec<IRect>,
}

impl RegionView {
    /// A view showing `width x height` pixels at 1:1 zoom, scrolled to the top
    pub fn new(win_rect: IRect) -> Self {
        let w = win_rect.width() as f32;
        let h = win_rect.height() as f32;
        Self {
            win_rect,
            cur: Rect::new(0.0, w, -h, 0.0),
            tot: Rect::new(0.0, w, -h, 0.0),
            scrollers: Vec::new(),
        }
    }

    /// Convert a window-space point to view space
    pub fn window_to_view(&self, p: Point) -> Point {
        let win_w = self.win_rect.width().max(1) as f32;
        let win_h = self.win_rect.height().max(1) as f32;
        Point::new(
            self.cur.xmin + (p.x - self.win_rect.xmin as f32) * self.cur.width() / win_w,
            self.cur.ymin + (p.y - self.win_rect.ymin as f32) * self.cur.height() / win_h,
        )
    }

    pub fn view_to_window(&self, p: Point) -> Point {
        let (zoom_x, zoom_y) = self.zoom_factors();
        Point::new(
            self.win_rect.xmin as f32 + (p.x - self.cur.xmin) / zoom_x,
            self.win_rect.ymin as f32 + (p.y - self.cur.ymin) / zoom_y,
        )
    }

    pub fn rect_to_window(&self, r: Rect) -> Rect {
        let min = self.view_to_window(Point::new(r.xmin, r.ymin));
        let max = self.view_to_window(Point::new(r.xmax, r.ymax));
        Rect::new(min.x, max.x, min.y, max.y)
    }

    /// Window point relative to the region's bottom-left corner, in pixels
    pub fn window_to_region(&self, p: Point) -> (i32, i32) {
        (
            p.x.round() as i32 - self.win_rect.xmin,
            p.y.round() as i32 - self.win_rect.ymin,
        )
    }

    /// Ratio of view units to window pixels on each axis
    pub fn zoom_factors(&self) -> (f32, f32) {
        (
            self.cur.width() / self.win_rect.width().max(1) as f32,
            self.cur.height() / self.win_rect.height().max(1) as f32,
        )
    }

    pub fn mouse_in_scrollers(&self, p: Point) -> bool {
        let (x, y) = (p.x.round() as i32, p.y.round() as i32);
        self.scrollers.iter().any(|r| r.contains(x, y))
    }

    /// Move the visible rect by a view-space delta (edge panning, wheel scroll)
    pub fn scroll_by(&mut self, dx: f32, dy: f32) {
        self.cur.xmin += dx;
        self.cur.xmax += dx;
        self.cur.ymin += dy;
        self.cur.ymax += dy;
    }

    /// Position the view at a fraction of the total extent on each axis
    ///
    /// `None` leaves an axis untouched. On the y axis `1.0` means the top.
    pub fn offset_to(&mut self, xfac: Option<f32>, yfac: Option<f32>) {
        if let Some(fac) = xfac {
            let slack = (self.tot.width() - self.cur.width()).max(0.0);
            let width = self.cur.width();
            self.cur.xmin = self.tot.xmin + slack * fac;
            self.cur.xmax = self.cur.xmin + width;
        }
        if let Some(fac) = yfac {
            let slack = (self.tot.height() - self.cur.height()).max(0.0);
            let height = self.cur.height();
            self.cur.ymax = self.tot.ymax - slack * (1.0 - fac);
            self.cur.ymin = self.cur.ymax - height;
        }
    }
}
