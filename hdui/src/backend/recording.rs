//! Renderer that records draw calls instead of producing pixels.
//!
//! Used by tests and tooling to inspect exactly what a tree draws.

use super::{GradientDirection, Renderer, Scaler, TextAlign};
use crate::bitmap::{Bitmap, Region};
use crate::color::Color;
use crate::error::Result;

/// One recorded renderer call, in design-space coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame,
    EndFrame,
    Clear(Color),
    RectFilled {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    RectOutline {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        thickness: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
        thickness: f32,
    },
    Gradient {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        start: Color,
        end: Color,
        direction: GradientDirection,
    },
    Text {
        font: String,
        size: u32,
        x: f32,
        y: f32,
        text: String,
        color: Color,
        align: TextAlign,
    },
    Bitmap {
        region: Region,
        x: f32,
        y: f32,
        w: Option<f32>,
        h: Option<f32>,
        alpha: f32,
    },
}

/// Records every call made through the [`Renderer`] trait.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
    scaler: Scaler,
    initialized: bool,
    init_calls: usize,
    shutdown_calls: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `init` has been called.
    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    /// Number of `shutdown` calls that released an initialized backend.
    pub fn shutdown_calls(&self) -> usize {
        self.shutdown_calls
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Text runs drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Renderer for RecordingRenderer {
    fn init(&mut self, width: u32, height: u32, _fullscreen: bool) -> Result<()> {
        self.init_calls += 1;
        self.scaler.set_display_size(width, height);
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.initialized {
            self.shutdown_calls += 1;
            self.initialized = false;
        }
    }

    fn begin_frame(&mut self) {
        self.commands.push(DrawCommand::BeginFrame);
    }

    fn end_frame(&mut self) {
        self.commands.push(DrawCommand::EndFrame);
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_rect_filled(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands
            .push(DrawCommand::RectFilled { x, y, w, h, color });
    }

    fn draw_rect_outline(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::RectOutline {
            x,
            y,
            w,
            h,
            color,
            thickness,
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32) {
        self.commands.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            thickness,
        });
    }

    fn draw_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        start: Color,
        end: Color,
        direction: GradientDirection,
    ) {
        self.commands.push(DrawCommand::Gradient {
            x,
            y,
            w,
            h,
            start,
            end,
            direction,
        });
    }

    fn draw_text(
        &mut self,
        font: &str,
        size: u32,
        x: f32,
        y: f32,
        text: &str,
        color: Color,
        align: TextAlign,
    ) {
        self.commands.push(DrawCommand::Text {
            font: font.to_string(),
            size,
            x,
            y,
            text: text.to_string(),
            color,
            align,
        });
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: f32, y: f32, alpha: f32) {
        self.commands.push(DrawCommand::Bitmap {
            region: bitmap.region(),
            x,
            y,
            w: None,
            h: None,
            alpha,
        });
    }

    fn draw_bitmap_scaled(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32, alpha: f32) {
        self.commands.push(DrawCommand::Bitmap {
            region: bitmap.region(),
            x,
            y,
            w: Some(w),
            h: Some(h),
            alpha,
        });
    }

    fn scaler(&self) -> Scaler {
        self.scaler
    }

    fn set_base_resolution(&mut self, width: u32, height: u32) {
        self.scaler.set_base_resolution(width, height);
    }

    fn set_display_size(&mut self, width: u32, height: u32) {
        self.scaler.set_display_size(width, height);
    }
}
