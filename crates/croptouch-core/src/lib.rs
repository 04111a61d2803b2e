//! Croptouch Core - interactive crop geometry and extraction
//!
//! This crate provides the cropping engine for Croptouch: display layout
//! for a rotated bitmap, a draggable crop window with aspect and size
//! constraints, single-pointer gesture interpretation, and pixel-accurate
//! extraction of the selected region. It has zero dependency on any
//! rendering API - callers read geometry snapshots and draw them with
//! whatever toolkit they own.

pub mod bitmap;
pub mod geometry;
pub mod gesture;
pub mod rotated;
pub mod session;
pub mod transform;
pub mod window;

pub use bitmap::{Bitmap, BitmapError};
pub use geometry::{Point, Rect, Size};
pub use gesture::{GestureEvent, PointerEvent, TouchGestureDetector};
pub use rotated::RotatedImage;
pub use session::{CropError, CropSession, RenderSnapshot};
pub use transform::{rasterize, AffineTransform, SampleFilter};
pub use window::{CropWindow, Handle, HANDLE_GRAB_RADIUS, MIN_WINDOW_EDGE};

/// Crop policy supplied by the embedding application.
///
/// All fields default to 0, meaning "unset". Sizes are in source pixels;
/// the engine scales them into display space internally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropParams {
    /// Aspect numerator; both aspect fields > 0 locks the window ratio.
    pub aspect_x: i32,
    /// Aspect denominator.
    pub aspect_y: i32,
    /// Preferred output width; both output fields > 0 fixes the window size.
    pub output_width: i32,
    /// Preferred output height.
    pub output_height: i32,
    /// Hard cap on the window width, 0 for unlimited.
    pub max_output_width: i32,
    /// Hard cap on the window height, 0 for unlimited.
    pub max_output_height: i32,
}

impl CropParams {
    /// Create a new CropParams with every constraint unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True when the window ratio is locked. Zero or negative aspect values
    /// mean free-form.
    pub fn aspect_locked(&self) -> bool {
        self.aspect_x > 0 && self.aspect_y > 0
    }

    /// True when the window has a fixed size and may only be moved.
    pub fn fixed_output(&self) -> bool {
        self.output_width > 0 && self.output_height > 0
    }

    /// The locked width:height ratio, if any.
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.aspect_locked()
            .then(|| self.aspect_x as f32 / self.aspect_y as f32)
    }

    /// A copy with the size fields scaled into display space. The aspect
    /// ratio is dimensionless and kept as-is.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            aspect_x: self.aspect_x,
            aspect_y: self.aspect_y,
            output_width: (self.output_width as f32 * factor) as i32,
            output_height: (self.output_height as f32 * factor) as i32,
            max_output_width: (self.max_output_width as f32 * factor) as i32,
            max_output_height: (self.max_output_height as f32 * factor) as i32,
        }
    }
}
