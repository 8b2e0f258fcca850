//! Renderer backend contract.
//!
//! Nodes draw in design-space coordinates (the resolution a layout was
//! authored at). Backends map those onto the display with a [`Scaler`].

mod recording;
mod software;

pub use recording::{DrawCommand, RecordingRenderer};
pub use software::SoftwareRenderer;

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::Result;
use glam::Vec2;

/// Horizontal alignment of a text run relative to its anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Parse a layout `align` attribute. Unknown values align left.
    pub fn from_attr(s: &str) -> Self {
        match s {
            "center" => TextAlign::Center,
            "right" => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }
}

/// Axis along which a two-colour gradient runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GradientDirection {
    /// First colour at the top edge, second at the bottom.
    #[default]
    Vertical,
    /// First colour at the left edge, second at the right.
    Horizontal,
}

/// Maps design-space coordinates onto the display.
///
/// Each axis scales by `display / base`, so a 1920x1080 layout fills a
/// 1280x720 window at a factor of 2/3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    base: Vec2,
    display: Vec2,
}

impl Default for Scaler {
    fn default() -> Self {
        Self::new(1920, 1080, 1920, 1080)
    }
}

impl Scaler {
    pub fn new(base_width: u32, base_height: u32, display_width: u32, display_height: u32) -> Self {
        Self {
            base: Vec2::new(base_width as f32, base_height as f32),
            display: Vec2::new(display_width as f32, display_height as f32),
        }
    }

    pub fn set_base_resolution(&mut self, width: u32, height: u32) {
        self.base = Vec2::new(width as f32, height as f32);
    }

    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.display = Vec2::new(width as f32, height as f32);
    }

    pub fn base_size(&self) -> Vec2 {
        self.base
    }

    pub fn display_size(&self) -> Vec2 {
        self.display
    }

    /// Per-axis scale factor. A degenerate base resolution scales by 1.
    pub fn factor(&self) -> Vec2 {
        let fx = if self.base.x > 0.0 { self.display.x / self.base.x } else { 1.0 };
        let fy = if self.base.y > 0.0 { self.display.y / self.base.y } else { 1.0 };
        Vec2::new(fx, fy)
    }

    /// Design-space point to display pixels.
    pub fn point(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) * self.factor()
    }

    /// Design-space extent to display pixels.
    pub fn extent(&self, w: f32, h: f32) -> Vec2 {
        Vec2::new(w, h) * self.factor()
    }

    /// Display pixels back to design space (for mouse input).
    pub fn to_design(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) / self.factor()
    }
}

/// Drawing surface used by the UI tree.
///
/// Coordinates and extents are design-space; implementations scale them.
/// Stroke thickness is in display pixels. Font size is the authored pixel
/// size; backends may scale it with the vertical factor.
pub trait Renderer {
    /// Prepare the backend for a display of the given size.
    fn init(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<()>;

    /// Release backend resources. Safe to call more than once.
    fn shutdown(&mut self);

    fn begin_frame(&mut self);

    fn end_frame(&mut self);

    fn clear(&mut self, color: Color);

    fn draw_rect_filled(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    fn draw_rect_outline(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, thickness: f32);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32);

    /// Two-colour gradient quad.
    #[allow(clippy::too_many_arguments)]
    fn draw_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        start: Color,
        end: Color,
        direction: GradientDirection,
    );

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        font: &str,
        size: u32,
        x: f32,
        y: f32,
        text: &str,
        color: Color,
        align: TextAlign,
    );

    /// Draw a bitmap at its natural pixel size.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: f32, y: f32, alpha: f32);

    /// Draw a bitmap stretched to a design-space rectangle.
    fn draw_bitmap_scaled(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32, alpha: f32);

    fn scaler(&self) -> Scaler;

    fn set_base_resolution(&mut self, width: u32, height: u32);

    fn set_display_size(&mut self, width: u32, height: u32);
}
