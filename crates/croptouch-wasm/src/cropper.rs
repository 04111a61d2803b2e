//! The interactive cropper binding.
//!
//! Wraps a core `CropSession` as one JavaScript class: the host page feeds
//! it pointer events and reads back geometry snapshots to draw the image,
//! the dimming mask, and the drag handles onto a canvas. The binding
//! performs no drawing itself.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new Cropper(canvas.width, canvas.height);
//! cropper.initialize(image, 0, { aspect_x: 4, aspect_y: 3 });
//!
//! canvas.onpointermove = (e) => {
//!   if (cropper.pointer_moved(e.offsetX, e.offsetY)) draw();
//! };
//!
//! function draw() {
//!   const [a, b, c, d, e, f] = cropper.display_matrix();
//!   ctx.setTransform(a, b, c, d, e, f);
//!   // ... draw the image, then the mask_rects() and handle_positions()
//! }
//!
//! const result = cropper.crop();
//! ```

use croptouch_core::{CropParams, CropSession, PointerEvent, Size};
use wasm_bindgen::prelude::*;

use crate::types::JsBitmap;

/// An interactive cropping session over one image.
#[wasm_bindgen]
pub struct Cropper {
    session: CropSession,
}

#[wasm_bindgen]
impl Cropper {
    /// Create a cropper for a viewport of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(viewport_width: f32, viewport_height: f32) -> Cropper {
        Cropper {
            session: CropSession::new(Size::new(viewport_width, viewport_height)),
        }
    }

    /// Supply the image, its clockwise rotation hint, and the crop policy.
    ///
    /// `params` is a plain object with any of `aspect_x`, `aspect_y`,
    /// `output_width`, `output_height`, `max_output_width`,
    /// `max_output_height`; pass `undefined` for a free-form window.
    ///
    /// # Errors
    ///
    /// Returns an error when the params object does not deserialize or the
    /// image/viewport is empty.
    pub fn initialize(
        &mut self,
        image: &JsBitmap,
        degrees: i32,
        params: JsValue,
    ) -> Result<(), JsValue> {
        let params: CropParams = if params.is_undefined() || params.is_null() {
            CropParams::default()
        } else {
            serde_wasm_bindgen::from_value(params).map_err(|e| {
                let message = format!("invalid crop params: {e}");
                web_sys::console::warn_1(&JsValue::from_str(&message));
                JsValue::from_str(&message)
            })?
        };

        self.session
            .initialize(image.to_bitmap(), degrees, params)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Swap in a new image, keeping the current crop policy.
    pub fn replace_image(&mut self, image: &JsBitmap, degrees: i32) -> Result<(), JsValue> {
        self.session
            .replace_image(image.to_bitmap(), degrees)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Resize the viewport; the layout and crop window are recomputed.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.session.set_viewport(Size::new(width, height));
    }

    /// Feed a pointer press. Returns true when a redraw is needed.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_pointer(PointerEvent::Down { x, y })
    }

    /// Feed a pointer move. Returns true when a redraw is needed.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_pointer(PointerEvent::Move { x, y })
    }

    /// Feed a pointer release. Returns true when a redraw is needed.
    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_pointer(PointerEvent::Up { x, y })
    }

    /// Feed a pointer cancellation (e.g. `pointercancel`).
    pub fn pointer_cancelled(&mut self, x: f32, y: f32) -> bool {
        self.session.handle_pointer(PointerEvent::Cancel { x, y })
    }

    /// Rotate the displayed image by 90 degrees clockwise.
    pub fn rotate(&mut self) {
        self.session.rotate();
    }

    /// Rotate the displayed image by an arbitrary delta in degrees.
    pub fn rotate_by(&mut self, degrees: i32) {
        self.session.rotate_by(degrees);
    }

    /// Drop accumulated rotation and restore the default window.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// True once an image has been supplied.
    #[wasm_bindgen(getter)]
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// The fit-inside scale rate, absent while uninitialized.
    #[wasm_bindgen(getter)]
    pub fn scale_rate(&self) -> Option<f32> {
        self.session.render_state().map(|s| s.scale_rate)
    }

    /// Current rotation in degrees clockwise, absent while uninitialized.
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> Option<i32> {
        self.session.rotation()
    }

    /// The crop window rectangle `{left, top, right, bottom}`, or null.
    pub fn window_rect(&self) -> JsValue {
        match self.session.render_state() {
            Some(snapshot) => {
                serde_wasm_bindgen::to_value(&snapshot.window).unwrap_or(JsValue::NULL)
            }
            None => JsValue::NULL,
        }
    }

    /// The four dimming-mask rectangles covering bounds minus window.
    pub fn mask_rects(&self) -> js_sys::Array {
        let out = js_sys::Array::new();
        if let Some(snapshot) = self.session.render_state() {
            for rect in &snapshot.mask {
                if let Ok(value) = serde_wasm_bindgen::to_value(rect) {
                    out.push(&value);
                }
            }
        }
        out
    }

    /// The window corners `{x, y}` in TL, TR, BL, BR order.
    pub fn handle_positions(&self) -> js_sys::Array {
        let out = js_sys::Array::new();
        if let Some(snapshot) = self.session.render_state() {
            for point in &snapshot.handles {
                if let Ok(value) = serde_wasm_bindgen::to_value(point) {
                    out.push(&value);
                }
            }
        }
        out
    }

    /// Classify a viewport point against the crop window, for cursor
    /// feedback. Returns a handle name string or null.
    pub fn hit_test(&self, x: f32, y: f32) -> JsValue {
        match self.session.hit_test(x, y) {
            Some(handle) => serde_wasm_bindgen::to_value(&handle).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// The display transform in canvas `setTransform` argument order
    /// `[a, b, c, d, e, f]`, or absent while uninitialized.
    pub fn display_matrix(&self) -> Option<Vec<f32>> {
        self.session.render_state().map(|snapshot| {
            // Core coefficients are row-major [a b c; d e f]; canvas wants
            // column order a, d, b, e, c, f
            let [a, b, c, d, e, f] = snapshot.display_transform.coefficients();
            vec![a, d, b, e, c, f]
        })
    }

    /// Extract the selected region, or absent while uninitialized.
    pub fn crop(&self) -> Option<JsBitmap> {
        self.session.crop().map(JsBitmap::from_bitmap)
    }
}
