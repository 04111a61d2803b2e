//! WASM-compatible wrapper types for bitmap data.
//!
//! This module provides the JavaScript-friendly bitmap wrapper that crosses
//! the boundary in both directions: callers construct one from decoded RGB
//! data, and `crop()` hands one back.

use croptouch_core::Bitmap;
use wasm_bindgen::prelude::*;

/// A bitmap wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`. The `free()` method can be
/// called to explicitly release WASM memory, but this is optional as
/// wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a new JsBitmap from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
    ///
    /// # Errors
    ///
    /// Returns an error when the buffer length does not match the
    /// dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        Bitmap::from_raw(width, height, pixels)
            .map(|inner| JsBitmap { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns RGB pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data for safe memory
    /// management.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically. Call this if you want to immediately release memory
    /// for a large image.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    /// Wrap a core bitmap coming out of the engine.
    pub(crate) fn from_bitmap(inner: Bitmap) -> Self {
        Self { inner }
    }

    /// Convert back to a core bitmap for the engine.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Bitmap {
        self.inner.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_bitmap_creation() {
        let img = JsBitmap::from_bitmap(Bitmap::new(100, 50, vec![0u8; 100 * 50 * 3]));
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_js_bitmap_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8]; // 2 RGB pixels
        let img = JsBitmap::from_bitmap(Bitmap::new(2, 1, pixels.clone()));
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_round_trip() {
        let img = JsBitmap::from_bitmap(Bitmap::new(4, 4, vec![7u8; 48]));
        let core = img.to_bitmap();
        assert_eq!(core.width, 4);
        assert_eq!(core.height, 4);
        assert_eq!(core.pixels, vec![7u8; 48]);
    }
}
