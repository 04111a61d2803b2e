//! Croptouch WASM - WebAssembly bindings for the Croptouch cropping engine
//!
//! This crate exposes the croptouch-core engine to JavaScript/TypeScript
//! applications as a single `Cropper` class plus a bitmap wrapper type.
//!
//! # Module Structure
//!
//! - `cropper` - The interactive cropping session binding
//! - `types` - WASM-compatible wrapper types for bitmap data
//!
//! # Usage
//!
//! ```typescript
//! import init, { Cropper, JsBitmap } from '@croptouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const image = new JsBitmap(width, height, rgbBytes);
//! const cropper = new Cropper(canvas.width, canvas.height);
//! cropper.initialize(image, 90, { aspect_x: 1, aspect_y: 1 });
//!
//! const cropped = cropper.crop();
//! console.log(`Cropped ${cropped.width}x${cropped.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod types;

// Re-export public types
pub use cropper::Cropper;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
