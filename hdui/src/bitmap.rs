//! Decoded bitmaps and sub-bitmap views.
//!
//! A [`Bitmap`] is a cheap handle onto shared RGBA pixels plus the region of
//! those pixels it covers. Sub-bitmaps created from an atlas are views into
//! the atlas pixels, never copies.

use crate::error::{HdUiError, Result};
use image::{Rgba, RgbaImage};
use std::path::Path;
use std::rc::Rc;

/// Pixel rectangle within a bitmap's backing image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Handle onto shared RGBA pixels.
#[derive(Clone)]
pub struct Bitmap {
    pixels: Rc<RgbaImage>,
    region: Region,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("region", &self.region)
            .field("is_view", &self.is_view())
            .finish()
    }
}

impl Bitmap {
    /// Wrap an already decoded image.
    pub fn from_image(image: RgbaImage) -> Self {
        let region = Region {
            x: 0,
            y: 0,
            width: image.width(),
            height: image.height(),
        };
        Self {
            pixels: Rc::new(image),
            region,
        }
    }

    /// Decode an image file (any format the `image` crate was built with).
    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .map_err(|source| HdUiError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        log::debug!(
            "Loaded bitmap {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self::from_image(image))
    }

    /// Create a view onto part of this bitmap.
    ///
    /// The requested rectangle is relative to this bitmap and clamped to its
    /// bounds. The view shares pixels with its parent.
    pub fn sub_bitmap(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x = x.min(self.region.width);
        let y = y.min(self.region.height);
        let width = width.min(self.region.width - x);
        let height = height.min(self.region.height - y);

        Self {
            pixels: Rc::clone(&self.pixels),
            region: Region {
                x: self.region.x + x,
                y: self.region.y + y,
                width,
                height,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.region.width
    }

    pub fn height(&self) -> u32 {
        self.region.height
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// True when this handle covers only part of its backing pixels.
    pub fn is_view(&self) -> bool {
        self.region.width != self.pixels.width() || self.region.height != self.pixels.height()
    }

    /// True when both handles share the same backing pixels.
    pub fn shares_pixels_with(&self, other: &Bitmap) -> bool {
        Rc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Pixel at `(x, y)` relative to this bitmap's region.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.region.width || y >= self.region.height {
            return None;
        }
        Some(*self.pixels.get_pixel(self.region.x + x, self.region.y + y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Bitmap {
        let mut image = RgbaImage::new(4, 4);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, 0, 255]);
        }
        Bitmap::from_image(image)
    }

    #[test]
    fn test_sub_bitmap_is_view() {
        let parent = checker();
        let view = parent.sub_bitmap(1, 2, 2, 2);

        assert!(view.is_view());
        assert!(!parent.is_view());
        assert!(view.shares_pixels_with(&parent));
        assert_eq!(view.pixel(0, 0), Some(Rgba([1, 2, 0, 255])));
        assert_eq!(view.pixel(1, 1), Some(Rgba([2, 3, 0, 255])));
        assert_eq!(view.pixel(2, 0), None);
    }

    #[test]
    fn test_sub_bitmap_clamps() {
        let parent = checker();
        let view = parent.sub_bitmap(3, 3, 10, 10);
        assert_eq!((view.width(), view.height()), (1, 1));

        let outside = parent.sub_bitmap(10, 10, 5, 5);
        assert_eq!((outside.width(), outside.height()), (0, 0));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Bitmap::load(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(HdUiError::Image { .. })));
    }
}
