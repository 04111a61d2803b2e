//! The crop window: a draggable, resizable rectangle inside the displayed
//! image bounds.
//!
//! All coordinates are display-space. Every mutation clamps rather than
//! rejects: the window always holds a valid rectangle fully contained in its
//! bounds, at least [`MIN_WINDOW_EDGE`] on each side where the bounds allow
//! it, within the (display-scaled) maximum output size, and exactly on the
//! configured aspect ratio when one is locked. There is no error state for
//! "shrunk too far" or "dragged outside" - the geometry simply stops.
//!
//! # Resize rules
//!
//! - Interior drags translate the whole window, clamped per axis.
//! - Free-form edge/corner drags move the grabbed edges, limited by the
//!   grow border (bounds tightened by the max output size) and the minimum
//!   edge floor.
//! - Aspect-locked corner drags scale uniformly about the opposite corner.
//! - Aspect-locked edge drags keep the opposite edge anchored and resize the
//!   perpendicular pair symmetrically about the window center.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::CropParams;

/// Hit tolerance radius around corners and edges, independent of window
/// size so handles stay grabbable when the window is small.
pub const HANDLE_GRAB_RADIUS: f32 = 40.0;

/// Minimum usable window edge: one drag-handle diameter.
pub const MIN_WINDOW_EDGE: f32 = 2.0 * HANDLE_GRAB_RADIUS;

/// The part of the crop window a drag is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
    /// Interior: dragging translates the whole window.
    Body,
}

/// The crop window geometry engine.
#[derive(Debug, Clone)]
pub struct CropWindow {
    bounds: Rect,
    rect: Rect,
    params: CropParams,
    active: Option<Handle>,
}

impl CropWindow {
    /// Create a window centered in `bounds` with the default size for
    /// `params`.
    ///
    /// `params` must already be scaled into display space. Fixed output
    /// dimensions take the window exactly; otherwise the max output size
    /// seeds it, falling back to 4/5 of the smaller bounds edge, and an
    /// aspect lock derives the smaller dimension. A seed larger than the
    /// bounds is shrunk shape-preserving so containment holds from the
    /// start.
    pub fn new(bounds: Rect, params: CropParams) -> Self {
        let mut width = bounds.width().min(bounds.height()) * 4.0 / 5.0;
        let mut height = width;

        if params.fixed_output() {
            width = params.output_width as f32;
            height = params.output_height as f32;
        } else {
            if params.max_output_width > 0 && params.max_output_height > 0 {
                width = params.max_output_width as f32;
                height = params.max_output_height as f32;
            }
            if let Some(ratio) = params.aspect_ratio() {
                if ratio >= 1.0 {
                    height = width / ratio;
                } else {
                    width = height * ratio;
                }
            }
        }

        let fit = (bounds.width() / width).min(bounds.height() / height);
        if fit < 1.0 {
            width *= fit;
            height *= fit;
        }

        let left = bounds.left + (bounds.width() - width) / 2.0;
        let top = bounds.top + (bounds.height() - height) / 2.0;

        Self {
            bounds,
            rect: Rect::from_min_size(left, top, width, height),
            params,
            active: None,
        }
    }

    /// The current crop rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The displayed-image bounds the window lives in.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    /// The handle currently being dragged, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        self.active
    }

    /// Classify a display-space point.
    ///
    /// Returns `None` for points outside every hit region. Precedence when
    /// regions overlap: corner > edge > interior. Fixed-output windows are
    /// move-only, so corner and edge regions are not offered for them.
    pub fn hit_test(&self, p: Point) -> Option<Handle> {
        let r = self.rect;
        let near = |a: f32, b: f32| (a - b).abs() <= HANDLE_GRAB_RADIUS;

        if !self.params.fixed_output() {
            let corners = [
                (Handle::TopLeft, r.left, r.top),
                (Handle::TopRight, r.right, r.top),
                (Handle::BottomLeft, r.left, r.bottom),
                (Handle::BottomRight, r.right, r.bottom),
            ];
            for (handle, cx, cy) in corners {
                if near(p.x, cx) && near(p.y, cy) {
                    return Some(handle);
                }
            }

            let x_in_band =
                p.x >= r.left - HANDLE_GRAB_RADIUS && p.x < r.right + HANDLE_GRAB_RADIUS;
            let y_in_band =
                p.y >= r.top - HANDLE_GRAB_RADIUS && p.y < r.bottom + HANDLE_GRAB_RADIUS;

            if near(p.x, r.left) && y_in_band {
                return Some(Handle::Left);
            }
            if near(p.x, r.right) && y_in_band {
                return Some(Handle::Right);
            }
            if near(p.y, r.top) && x_in_band {
                return Some(Handle::Top);
            }
            if near(p.y, r.bottom) && x_in_band {
                return Some(Handle::Bottom);
            }
        }

        if r.contains(p) {
            return Some(Handle::Body);
        }
        None
    }

    /// Attach a drag to whatever is under `p`.
    ///
    /// A press outside every hit region attaches nothing; the following
    /// deltas are no-ops until the next press.
    pub fn begin_drag(&mut self, p: Point) -> Option<Handle> {
        self.active = self.hit_test(p);
        self.active
    }

    /// Detach the current drag. Idempotent.
    pub fn end_drag(&mut self) {
        self.active = None;
    }

    /// Apply an incremental drag delta to the active handle.
    pub fn apply_delta(&mut self, dx: f32, dy: f32) {
        let Some(handle) = self.active else {
            return;
        };

        if handle == Handle::Body {
            self.translate_clamped(dx, dy);
            return;
        }
        // Fixed-output windows move but never resize
        if self.params.fixed_output() {
            return;
        }
        if self.params.aspect_locked() {
            self.resize_locked(handle, dx, dy);
        } else {
            self.resize_free(handle, dx, dy);
        }
    }

    /// The four parts of the bounds not covered by the window: top strip,
    /// left band, right band, bottom strip. Non-overlapping and exhaustive.
    pub fn outside_mask_rects(&self) -> [Rect; 4] {
        let b = self.bounds;
        let r = self.rect;
        [
            Rect::new(b.left, b.top, b.right, r.top),
            Rect::new(b.left, r.top, r.left, r.bottom),
            Rect::new(r.right, r.top, b.right, r.bottom),
            Rect::new(b.left, r.bottom, b.right, b.bottom),
        ]
    }

    /// The window corners in top-left, top-right, bottom-left, bottom-right
    /// order, for positioning drag glyphs.
    pub fn drag_handle_positions(&self) -> [Point; 4] {
        let r = self.rect;
        [
            Point::new(r.left, r.top),
            Point::new(r.right, r.top),
            Point::new(r.left, r.bottom),
            Point::new(r.right, r.bottom),
        ]
    }

    /// The window rectangle converted into rotated-frame source pixels:
    /// translated to the bounds origin and divided by the display scale
    /// rate. Used only at crop time.
    pub fn window_rect_in_source(&self, scale_rate: f32) -> Rect {
        let r = self.rect;
        let b = self.bounds;
        Rect::from_min_size(
            (r.left - b.left) / scale_rate,
            (r.top - b.top) / scale_rate,
            r.width() / scale_rate,
            r.height() / scale_rate,
        )
    }

    fn translate_clamped(&mut self, dx: f32, dy: f32) {
        let r = self.rect;
        let b = self.bounds;
        // Clamp independently per axis so sliding along a boundary works
        let dx = dx.max(b.left - r.left).min(b.right - r.right);
        let dy = dy.max(b.top - r.top).min(b.bottom - r.bottom);
        self.rect = r.translate(dx, dy);
    }

    /// Bounds tightened so no edge can travel farther than the max output
    /// size from its opposite edge.
    fn grow_border(&self) -> Rect {
        let mut border = self.bounds;
        if self.params.max_output_width > 0 {
            let max_w = self.params.max_output_width as f32;
            border.left = (self.rect.right - max_w).max(self.bounds.left);
            border.right = (self.rect.left + max_w).min(self.bounds.right);
        }
        if self.params.max_output_height > 0 {
            let max_h = self.params.max_output_height as f32;
            border.top = (self.rect.bottom - max_h).max(self.bounds.top);
            border.bottom = (self.rect.top + max_h).min(self.bounds.bottom);
        }
        border
    }

    fn resize_free(&mut self, handle: Handle, dx: f32, dy: f32) {
        use Handle::*;
        let border = self.grow_border();
        let mut r = self.rect;

        // Containment clamps are applied last so they always win
        if matches!(handle, Left | TopLeft | BottomLeft) {
            r.left = (r.left + dx).min(r.right - MIN_WINDOW_EDGE).max(border.left);
        }
        if matches!(handle, Right | TopRight | BottomRight) {
            r.right = (r.right + dx).max(r.left + MIN_WINDOW_EDGE).min(border.right);
        }
        if matches!(handle, Top | TopLeft | TopRight) {
            r.top = (r.top + dy).min(r.bottom - MIN_WINDOW_EDGE).max(border.top);
        }
        if matches!(handle, Bottom | BottomLeft | BottomRight) {
            r.bottom = (r.bottom + dy).max(r.top + MIN_WINDOW_EDGE).min(border.bottom);
        }
        self.rect = r;
    }

    fn resize_locked(&mut self, handle: Handle, dx: f32, dy: f32) {
        use Handle::*;
        let Some(ratio) = self.params.aspect_ratio() else {
            return;
        };
        match handle {
            TopLeft | TopRight | BottomLeft | BottomRight => self.scale_about_pivot(handle, dx, dy),
            Left | Right => self.resize_horizontal_locked(handle, dx, ratio),
            Top | Bottom => self.resize_vertical_locked(handle, dy, ratio),
            Body => {}
        }
    }

    /// Aspect-locked corner drag: uniform scale about the opposite corner.
    fn scale_about_pivot(&mut self, handle: Handle, dx: f32, dy: f32) {
        use Handle::*;
        let border = self.grow_border();
        let r = self.rect;
        let w = r.width();
        let h = r.height();

        // Growth is measured away from the pivot corner
        let (grow_w, grow_h, avail_w, avail_h) = match handle {
            BottomRight => (dx, dy, border.right - r.left, border.bottom - r.top),
            TopLeft => (-dx, -dy, r.right - border.left, r.bottom - border.top),
            TopRight => (dx, -dy, border.right - r.left, r.bottom - border.top),
            BottomLeft => (-dx, dy, r.right - border.left, border.bottom - r.top),
            _ => return,
        };

        let desired = ((w + grow_w) / w).min((h + grow_h) / h);
        let floor = (MIN_WINDOW_EDGE / w).max(MIN_WINDOW_EDGE / h);
        let cap = (avail_w / w).min(avail_h / h);
        let s = desired.max(floor).min(cap);

        let nw = w * s;
        let nh = h * s;
        self.rect = match handle {
            BottomRight => Rect::new(r.left, r.top, r.left + nw, r.top + nh),
            TopLeft => Rect::new(r.right - nw, r.bottom - nh, r.right, r.bottom),
            TopRight => Rect::new(r.left, r.bottom - nh, r.left + nw, r.bottom),
            BottomLeft => Rect::new(r.right - nw, r.top, r.right, r.top + nh),
            _ => unreachable!(),
        };
    }

    /// Aspect-locked left/right edge drag: opposite edge anchored, top and
    /// bottom resize symmetrically about the window center.
    fn resize_horizontal_locked(&mut self, handle: Handle, dx: f32, ratio: f32) {
        let border = self.grow_border();
        let r = self.rect;
        let cy = r.center_y();
        let half_space = (cy - border.top).min(border.bottom - cy);

        let reach = match handle {
            Handle::Right => border.right - r.left,
            _ => r.right - border.left,
        };
        let mut w_max = reach.min(2.0 * half_space * ratio);
        if self.params.max_output_height > 0 {
            w_max = w_max.min(self.params.max_output_height as f32 * ratio);
        }
        let w_min = MIN_WINDOW_EDGE.max(MIN_WINDOW_EDGE * ratio);

        let desired = match handle {
            Handle::Right => r.width() + dx,
            _ => r.width() - dx,
        };
        let nw = desired.max(w_min).min(w_max);
        let nh = nw / ratio;

        let (left, right) = match handle {
            Handle::Right => (r.left, r.left + nw),
            _ => (r.right - nw, r.right),
        };
        self.rect = Rect::new(left, cy - nh / 2.0, right, cy + nh / 2.0);
    }

    /// Aspect-locked top/bottom edge drag, mirror of the horizontal case.
    fn resize_vertical_locked(&mut self, handle: Handle, dy: f32, ratio: f32) {
        let border = self.grow_border();
        let r = self.rect;
        let cx = r.center_x();
        let half_space = (cx - border.left).min(border.right - cx);

        let reach = match handle {
            Handle::Bottom => border.bottom - r.top,
            _ => r.bottom - border.top,
        };
        let mut h_max = reach.min(2.0 * half_space / ratio);
        if self.params.max_output_width > 0 {
            h_max = h_max.min(self.params.max_output_width as f32 / ratio);
        }
        let h_min = MIN_WINDOW_EDGE.max(MIN_WINDOW_EDGE / ratio);

        let desired = match handle {
            Handle::Bottom => r.height() + dy,
            _ => r.height() - dy,
        };
        let nh = desired.max(h_min).min(h_max);
        let nw = nh * ratio;

        let (top, bottom) = match handle {
            Handle::Bottom => (r.top, r.top + nh),
            _ => (r.bottom - nh, r.bottom),
        };
        self.rect = Rect::new(cx - nw / 2.0, top, cx + nw / 2.0, bottom);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    /// Pick the drag start point for a handle index on the current rect.
    fn handle_point(window: &CropWindow, which: usize) -> Point {
        let r = window.rect();
        match which {
            0 => Point::new(r.left, r.top),
            1 => Point::new(r.right, r.top),
            2 => Point::new(r.left, r.bottom),
            3 => Point::new(r.right, r.bottom),
            4 => Point::new(r.left, r.center_y()),
            5 => Point::new(r.right, r.center_y()),
            6 => Point::new(r.center_x(), r.top),
            7 => Point::new(r.center_x(), r.bottom),
            _ => r.center(),
        }
    }

    /// Strategy for a sequence of drag operations.
    fn ops_strategy() -> impl Strategy<Value = Vec<(usize, f32, f32)>> {
        prop::collection::vec((0usize..9, -300.0f32..300.0, -300.0f32..300.0), 1..40)
    }

    proptest! {
        /// Property: the window stays inside its bounds under any drag
        /// sequence.
        #[test]
        fn prop_rect_always_contained(ops in ops_strategy()) {
            let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
            let mut window = CropWindow::new(bounds, CropParams::new());

            for (which, dx, dy) in ops {
                window.begin_drag(handle_point(&window, which));
                window.apply_delta(dx, dy);
                window.end_drag();

                let r = window.rect();
                prop_assert!(r.left >= bounds.left - EPS, "left {} out of bounds", r.left);
                prop_assert!(r.top >= bounds.top - EPS, "top {} out of bounds", r.top);
                prop_assert!(r.right <= bounds.right + EPS, "right {} out of bounds", r.right);
                prop_assert!(r.bottom <= bounds.bottom + EPS, "bottom {} out of bounds", r.bottom);
            }
        }

        /// Property: the window never collapses below the minimum edge.
        #[test]
        fn prop_rect_never_collapses(ops in ops_strategy()) {
            let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
            let mut window = CropWindow::new(bounds, CropParams::new());

            for (which, dx, dy) in ops {
                window.begin_drag(handle_point(&window, which));
                window.apply_delta(dx, dy);
                window.end_drag();

                prop_assert!(window.width() >= MIN_WINDOW_EDGE - EPS);
                prop_assert!(window.height() >= MIN_WINDOW_EDGE - EPS);
            }
        }

        /// Property: a 4:3 aspect lock holds through any drag sequence.
        #[test]
        fn prop_aspect_lock_holds(ops in ops_strategy()) {
            let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
            let mut params = CropParams::new();
            params.aspect_x = 4;
            params.aspect_y = 3;
            let mut window = CropWindow::new(bounds, params);

            for (which, dx, dy) in ops {
                window.begin_drag(handle_point(&window, which));
                window.apply_delta(dx, dy);
                window.end_drag();

                let r = window.rect();
                prop_assert!(
                    (r.width() / r.height() - 4.0 / 3.0).abs() < EPS,
                    "ratio drifted to {}",
                    r.width() / r.height()
                );
            }
        }

        /// Property: the max output ceiling survives any drag sequence.
        #[test]
        fn prop_max_output_ceiling_holds(ops in ops_strategy()) {
            let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
            let mut params = CropParams::new();
            params.max_output_width = 150;
            params.max_output_height = 120;
            let mut window = CropWindow::new(bounds, params);

            for (which, dx, dy) in ops {
                window.begin_drag(handle_point(&window, which));
                window.apply_delta(dx, dy);
                window.end_drag();

                prop_assert!(window.width() <= 150.0 + EPS, "width {}", window.width());
                prop_assert!(window.height() <= 120.0 + EPS, "height {}", window.height());
            }
        }

        /// Property: the mask partition always tiles bounds \ rect.
        #[test]
        fn prop_mask_partition_tiles_bounds(ops in ops_strategy()) {
            let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
            let mut window = CropWindow::new(bounds, CropParams::new());

            for (which, dx, dy) in ops {
                window.begin_drag(handle_point(&window, which));
                window.apply_delta(dx, dy);
                window.end_drag();

                let outside: f32 = window
                    .outside_mask_rects()
                    .iter()
                    .map(|r| r.width().max(0.0) * r.height().max(0.0))
                    .sum();
                let window_area = window.width() * window.height();
                let total = bounds.width() * bounds.height();
                prop_assert!((outside + window_area - total).abs() < 1.0);
            }
        }
    }
}
