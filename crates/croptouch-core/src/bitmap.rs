//! Owned bitmap buffers exchanged with the embedding application.
//!
//! The engine's boundary contract is "decoded bitmap in, decoded bitmap
//! out": callers hand over RGB pixel data they already decoded, and receive
//! a freshly allocated bitmap back from the crop pass. No file format or
//! decoding concern lives here.

use thiserror::Error;

/// Error types for bitmap construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitmapError {
    /// The pixel buffer length does not match the declared dimensions.
    #[error("pixel buffer of {actual} bytes does not match {width}x{height} RGB dimensions")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

/// A bitmap with RGB pixel data.
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Checked constructor for buffers crossing the API boundary.
    ///
    /// # Errors
    ///
    /// Returns [`BitmapError::BufferSizeMismatch`] when the buffer length is
    /// not `width * height * 3`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(BitmapError::BufferSizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a Bitmap from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Read the pixel at the given coordinates.
    ///
    /// Coordinates must be in bounds; this is the sampler's hot path.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid bitmap.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
