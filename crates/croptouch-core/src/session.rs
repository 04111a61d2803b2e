//! The cropping session: the composition root that wires gestures to
//! geometry and performs the final extraction.
//!
//! A session is an explicit two-state machine: `Uninitialized` until the
//! caller supplies a bitmap, then `Ready` with the image, crop window, and
//! display transform as one unit. Every operation pattern-matches on the
//! state, so there are no partially initialized fields to guard. Gesture
//! events arriving while uninitialized are silently ignored and extraction
//! returns absence - spurious input during screen transitions is expected,
//! not an error.
//!
//! All mutation is single-threaded and synchronous. `crop()` is a bounded
//! pixel copy proportional to the output size; latency-sensitive callers
//! should dispatch it themselves.

use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::geometry::{Point, Rect, Size};
use crate::gesture::{GestureEvent, PointerEvent, TouchGestureDetector};
use crate::rotated::RotatedImage;
use crate::transform::{rasterize, AffineTransform, SampleFilter};
use crate::window::{CropWindow, Handle};
use crate::CropParams;

/// Error types for session initialization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    /// The supplied bitmap has no pixels.
    #[error("image has no pixels")]
    EmptyImage,

    /// The viewport has no area, so no display layout exists.
    #[error("viewport has no area")]
    EmptyViewport,
}

/// Read-only snapshot of everything a caller-owned draw routine needs.
///
/// The engine computes what to draw; it never draws. The snapshot borrows
/// the session, so it cannot outlive the state it describes.
pub struct RenderSnapshot<'a> {
    /// The source bitmap, untouched by rotation or scaling.
    pub bitmap: &'a Bitmap,
    /// Maps source pixel coordinates onto the viewport (rotate, then scale,
    /// then center).
    pub display_transform: AffineTransform,
    /// The fit-inside scale rate from rotated-frame pixels to display.
    pub scale_rate: f32,
    /// The crop window rectangle in display coordinates.
    pub window: Rect,
    /// Dimming overlay rectangles covering bounds minus window.
    pub mask: [Rect; 4],
    /// Window corners in TL, TR, BL, BR order for drag glyphs.
    pub handles: [Point; 4],
}

/// Everything owned by a ready session, laid out for the current viewport.
#[derive(Debug)]
struct ActiveCrop {
    image: RotatedImage,
    window: CropWindow,
    display_transform: AffineTransform,
    scale_rate: f32,
}

impl ActiveCrop {
    /// Compute the display layout for `image` inside `viewport`.
    ///
    /// The scale rate fits the rotated frame inside the viewport while
    /// preserving aspect; the transform composes rotation, scale, and the
    /// centering translation in exactly that order. The crop window is
    /// always created fresh - it has no identity across layout changes.
    fn layout(image: RotatedImage, viewport: Size, params: &CropParams) -> Self {
        let frame_w = image.width() as f32;
        let frame_h = image.height() as f32;
        let scale_rate = (viewport.width / frame_w).min(viewport.height / frame_h);
        let offset_x = (viewport.width - frame_w * scale_rate) / 2.0;
        let offset_y = (viewport.height - frame_h * scale_rate) / 2.0;

        let display_transform = image
            .rotation_transform()
            .then(AffineTransform::scale(scale_rate))
            .then(AffineTransform::translation(offset_x, offset_y));

        let bounds = Rect::from_min_size(
            offset_x,
            offset_y,
            frame_w * scale_rate,
            frame_h * scale_rate,
        );
        let window = CropWindow::new(bounds, params.scaled(scale_rate));

        Self {
            image,
            window,
            display_transform,
            scale_rate,
        }
    }
}

#[derive(Debug, Default)]
enum SessionState {
    #[default]
    Uninitialized,
    Ready(ActiveCrop),
}

/// An interactive cropping session over one image.
#[derive(Debug, Default)]
pub struct CropSession {
    viewport: Size,
    params: CropParams,
    detector: TouchGestureDetector,
    state: SessionState,
}

impl CropSession {
    /// Create an uninitialized session for the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// True once an image has been supplied.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The unscaled crop policy supplied at initialization.
    pub fn params(&self) -> CropParams {
        self.params
    }

    /// Current rotation in degrees clockwise, absent while uninitialized.
    pub fn rotation(&self) -> Option<i32> {
        match &self.state {
            SessionState::Ready(active) => Some(active.image.rotation()),
            SessionState::Uninitialized => None,
        }
    }

    /// Supply the image and crop policy, replacing any previous image.
    ///
    /// `degrees` is the clockwise rotation hint for the bitmap, typically
    /// one of 0/90/180/270. Params are kept for the lifetime of the image
    /// (and through `replace_image`).
    pub fn initialize(
        &mut self,
        bitmap: Bitmap,
        degrees: i32,
        params: CropParams,
    ) -> Result<(), CropError> {
        if bitmap.is_empty() {
            return Err(CropError::EmptyImage);
        }
        if self.viewport.is_empty() {
            return Err(CropError::EmptyViewport);
        }
        self.params = params;
        self.install(bitmap, degrees);
        Ok(())
    }

    /// Swap in a new bitmap, keeping the current crop policy.
    ///
    /// The previous image is moved out and dropped here: there is never
    /// more than one live owner of pixel data.
    pub fn replace_image(&mut self, bitmap: Bitmap, degrees: i32) -> Result<(), CropError> {
        if bitmap.is_empty() {
            return Err(CropError::EmptyImage);
        }
        if self.viewport.is_empty() {
            return Err(CropError::EmptyViewport);
        }
        self.install(bitmap, degrees);
        Ok(())
    }

    fn install(&mut self, bitmap: Bitmap, degrees: i32) {
        let image = RotatedImage::new(bitmap, degrees);
        self.state = SessionState::Ready(ActiveCrop::layout(image, self.viewport, &self.params));
    }

    /// Recompute the layout for the current viewport, discarding the old
    /// crop window.
    fn relayout(&mut self) {
        if let SessionState::Ready(active) = std::mem::take(&mut self.state) {
            self.state = SessionState::Ready(ActiveCrop::layout(
                active.image,
                self.viewport,
                &self.params,
            ));
        }
    }

    /// Resize the viewport. Relayouts when ready; an empty viewport keeps
    /// the previous layout until a usable size arrives.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if !viewport.is_empty() {
            self.relayout();
        }
    }

    /// Rotate the displayed image by 90 degrees clockwise.
    pub fn rotate(&mut self) {
        self.rotate_by(90);
    }

    /// Rotate the displayed image by an arbitrary delta in degrees.
    pub fn rotate_by(&mut self, delta_degrees: i32) {
        if let SessionState::Ready(active) = &mut self.state {
            active.image.rotate_by(delta_degrees);
            self.relayout();
        }
    }

    /// Drop any accumulated rotation and start over with a fresh default
    /// window.
    pub fn reset(&mut self) {
        if let SessionState::Ready(active) = &mut self.state {
            let back = -active.image.rotation();
            active.image.rotate_by(back);
            self.relayout();
        }
    }

    /// Classify a display-space point against the crop window.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Handle> {
        match &self.state {
            SessionState::Ready(active) => active.window.hit_test(Point::new(x, y)),
            SessionState::Uninitialized => None,
        }
    }

    /// Feed one raw pointer event; returns true when the window changed and
    /// a redraw is needed.
    ///
    /// While uninitialized every event is ignored. An interrupted gesture
    /// recovers on its own: `Up`/`Cancel` detaches the drag, and the next
    /// press simply overwrites the handle state.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let SessionState::Ready(active) = &mut self.state else {
            return false;
        };

        match self.detector.handle(event) {
            Some(GestureEvent::Down { x, y }) => {
                active.window.begin_drag(Point::new(x, y));
                false
            }
            Some(GestureEvent::Moved { dx, dy, .. }) => {
                if active.window.active_handle().is_some() {
                    active.window.apply_delta(dx, dy);
                    true
                } else {
                    false
                }
            }
            Some(GestureEvent::Up { .. }) => {
                active.window.end_drag();
                false
            }
            None => false,
        }
    }

    /// Extract the selected region at source resolution, undoing the
    /// display rotation in the same pass.
    ///
    /// The output size is the display-space selection divided by the scale
    /// rate. Returns `None` while uninitialized; never mutates the image or
    /// the window.
    pub fn crop(&self) -> Option<Bitmap> {
        let SessionState::Ready(active) = &self.state else {
            return None;
        };

        let out_width = (active.window.width() / active.scale_rate).round().max(1.0) as u32;
        let out_height = (active.window.height() / active.scale_rate).round().max(1.0) as u32;

        let source_rect = active.window.window_rect_in_source(active.scale_rate);
        let output_rect = Rect::from_min_size(0.0, 0.0, out_width as f32, out_height as f32);

        // One map selects the region and undoes the rotation together
        let transform = active
            .image
            .rotation_transform()
            .then(AffineTransform::rect_to_rect(source_rect, output_rect)?);

        Some(rasterize(
            active.image.bitmap(),
            transform,
            out_width,
            out_height,
            SampleFilter::Bilinear,
        ))
    }

    /// Read-only render data for a caller-owned draw routine, absent while
    /// uninitialized.
    pub fn render_state(&self) -> Option<RenderSnapshot<'_>> {
        let SessionState::Ready(active) = &self.state else {
            return None;
        };
        Some(RenderSnapshot {
            bitmap: active.image.bitmap(),
            display_transform: active.display_transform,
            scale_rate: active.scale_rate,
            window: active.window.rect(),
            mask: active.window.outside_mask_rects(),
            handles: active.window.drag_handle_positions(),
        })
    }
}
