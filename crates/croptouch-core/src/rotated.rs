//! A bitmap paired with a logical rotation.
//!
//! Rotation is metadata only: the pixel buffer is never physically rotated
//! during interactive edits. The rotate-about-center transform is applied at
//! render time by the display pipeline and at extraction time by the crop
//! pass.

use std::cell::Cell;

use crate::bitmap::Bitmap;
use crate::transform::AffineTransform;

/// A bitmap with a clockwise rotation applied at display time.
#[derive(Debug)]
pub struct RotatedImage {
    bitmap: Bitmap,
    /// Degrees clockwise, normalized into [0, 360).
    rotation: i32,
    /// Lazily computed rotate-about-center transform, invalidated on
    /// rotation changes.
    transform: Cell<Option<AffineTransform>>,
}

impl RotatedImage {
    /// Wrap a bitmap with an initial rotation hint.
    ///
    /// Degrees are normalized into `[0, 360)`; negative inputs are accepted
    /// (`-90` becomes `270`).
    pub fn new(bitmap: Bitmap, degrees: i32) -> Self {
        Self {
            bitmap,
            rotation: degrees.rem_euclid(360),
            transform: Cell::new(None),
        }
    }

    /// Current rotation in degrees clockwise, in `[0, 360)`.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Add to the current rotation and renormalize.
    pub fn rotate_by(&mut self, delta_degrees: i32) {
        self.rotation = (self.rotation + delta_degrees).rem_euclid(360);
        self.transform.set(None);
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Width of the unrotated source bitmap.
    pub fn source_width(&self) -> u32 {
        self.bitmap.width
    }

    /// Height of the unrotated source bitmap.
    pub fn source_height(&self) -> u32 {
        self.bitmap.height
    }

    /// Width of the rotated display frame.
    pub fn width(&self) -> u32 {
        rotated_bounds(self.bitmap.width, self.bitmap.height, self.rotation).0
    }

    /// Height of the rotated display frame.
    pub fn height(&self) -> u32 {
        rotated_bounds(self.bitmap.width, self.bitmap.height, self.rotation).1
    }

    /// The transform mapping source bitmap coordinates into the rotated
    /// display frame.
    ///
    /// Rotates about the bitmap center, then recenters into the rotated
    /// frame whose dimensions are [`RotatedImage::width`] /
    /// [`RotatedImage::height`]. Pure function of the current state,
    /// recomputed lazily and cached until the rotation changes.
    pub fn rotation_transform(&self) -> AffineTransform {
        if let Some(cached) = self.transform.get() {
            return cached;
        }

        let computed = if self.rotation == 0 {
            AffineTransform::identity()
        } else {
            let cx = self.bitmap.width as f32 / 2.0;
            let cy = self.bitmap.height as f32 / 2.0;
            let (rw, rh) = rotated_bounds(self.bitmap.width, self.bitmap.height, self.rotation);
            AffineTransform::translation(-cx, -cy)
                .then(AffineTransform::rotation_degrees(self.rotation as f32))
                .then(AffineTransform::translation(
                    rw as f32 / 2.0,
                    rh as f32 / 2.0,
                ))
        };

        self.transform.set(Some(computed));
        computed
    }

    /// Consume the wrapper, handing the pixel buffer back to the caller.
    pub fn into_bitmap(self) -> Bitmap {
        self.bitmap
    }
}

/// Dimensions of the bounding box of a rotated bitmap.
///
/// Quarter-turn rotations swap or keep the dimensions exactly; any other
/// angle gets the bounding box of the rotated rectangle.
pub fn rotated_bounds(width: u32, height: u32, degrees: i32) -> (u32, u32) {
    match degrees.rem_euclid(360) {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        angle => {
            let rad = (angle as f32).to_radians();
            let cos = rad.cos().abs();
            let sin = rad.sin().abs();
            let w = width as f32;
            let h = height as f32;
            // Bounding box of a rotated rectangle:
            // new_w = |w*cos| + |h*sin|, new_h = |w*sin| + |h*cos|
            let new_w = (w * cos + h * sin).round() as u32;
            let new_h = (w * sin + h * cos).round() as u32;
            (new_w.max(1), new_h.max(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap::new(width, height, vec![0u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_rotation_normalized() {
        assert_eq!(RotatedImage::new(bitmap(4, 4), 0).rotation(), 0);
        assert_eq!(RotatedImage::new(bitmap(4, 4), 450).rotation(), 90);
        assert_eq!(RotatedImage::new(bitmap(4, 4), -90).rotation(), 270);
    }

    #[test]
    fn test_rotate_by_wraps() {
        let mut img = RotatedImage::new(bitmap(4, 4), 270);
        img.rotate_by(90);
        assert_eq!(img.rotation(), 0);
        img.rotate_by(-90);
        assert_eq!(img.rotation(), 270);
    }

    #[test]
    fn test_quarter_turns_swap_dimensions() {
        let img = RotatedImage::new(bitmap(100, 50), 90);
        assert_eq!((img.width(), img.height()), (50, 100));

        let img = RotatedImage::new(bitmap(100, 50), 180);
        assert_eq!((img.width(), img.height()), (100, 50));

        let img = RotatedImage::new(bitmap(100, 50), 270);
        assert_eq!((img.width(), img.height()), (50, 100));
    }

    #[test]
    fn test_diagonal_bounds() {
        // Diagonal of a 100x100 square is ~141.4
        let (w, h) = rotated_bounds(100, 100, 45);
        assert!(w > 140 && w < 143, "width was {}", w);
        assert!(h > 140 && h < 143, "height was {}", h);
    }

    #[test]
    fn test_opposite_angles_same_bounds() {
        let (w1, h1) = rotated_bounds(100, 80, 30);
        let (w2, h2) = rotated_bounds(100, 80, -30);
        assert_eq!(w1, w2);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [1, 15, 45, 89, 90, 135, 179, 180, 270, 359] {
            let (w, h) = rotated_bounds(10, 10, angle);
            assert!(w > 0, "width should be > 0 for angle {}", angle);
            assert!(h > 0, "height should be > 0 for angle {}", angle);
        }
    }

    #[test]
    fn test_zero_rotation_transform_is_identity() {
        let img = RotatedImage::new(bitmap(8, 4), 0);
        assert_eq!(img.rotation_transform(), AffineTransform::identity());
    }

    #[test]
    fn test_quarter_turn_transform_maps_pixel_centers() {
        // 4x4 bitmap rotated 90 degrees clockwise: the center of pixel
        // (0, 0) lands on the center of rotated-frame pixel (3, 0)
        let img = RotatedImage::new(bitmap(4, 4), 90);
        let p = img.rotation_transform().apply(Point::new(0.5, 0.5));
        assert!((p.x - 3.5).abs() < 1e-4, "x was {}", p.x);
        assert!((p.y - 0.5).abs() < 1e-4, "y was {}", p.y);
    }

    #[test]
    fn test_transform_cache_invalidated_on_rotate() {
        let mut img = RotatedImage::new(bitmap(4, 4), 0);
        assert_eq!(img.rotation_transform(), AffineTransform::identity());

        img.rotate_by(180);
        let t = img.rotation_transform();
        // 180 degrees maps the top-left pixel center onto the bottom-right
        let p = t.apply(Point::new(0.5, 0.5));
        assert!((p.x - 3.5).abs() < 1e-4 && (p.y - 3.5).abs() < 1e-4);
    }

    #[test]
    fn test_into_bitmap_returns_buffer() {
        let img = RotatedImage::new(bitmap(2, 2), 90);
        let b = img.into_bitmap();
        assert_eq!(b.width, 2);
        assert_eq!(b.byte_size(), 12);
    }
}
