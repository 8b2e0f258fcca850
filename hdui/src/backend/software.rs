//! CPU renderer drawing into an RGBA image.
//!
//! Used by the layout preview tool and by tests that check pixel output.
//! Blending is straight-alpha source-over.

use super::{GradientDirection, Renderer, Scaler, TextAlign};
use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::error::{HdUiError, Result};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

/// Renders into an in-memory canvas sized to the display.
pub struct SoftwareRenderer {
    canvas: RgbaImage,
    scaler: Scaler,
    fonts: HashMap<String, FontVec>,
    frames: u64,
    initialized: bool,
}

impl SoftwareRenderer {
    /// Create a renderer with a `width x height` canvas and a 1920x1080
    /// design resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            scaler: Scaler::new(1920, 1080, width, height),
            fonts: HashMap::new(),
            frames: 0,
            initialized: false,
        }
    }

    /// Register a TrueType/OpenType font under the name layouts refer to.
    pub fn load_font(&mut self, name: &str, path: &Path) -> Result<()> {
        let data = std::fs::read(path).map_err(|source| HdUiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_font(name, data)
    }

    /// Register font bytes under `name`.
    pub fn add_font(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let font = FontVec::try_from_vec(data).map_err(|_| HdUiError::Font {
            name: name.to_string(),
        })?;
        self.fonts.insert(name.to_string(), font);
        log::debug!("Registered font '{}'", name);
        Ok(())
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x < self.canvas.width() && y < self.canvas.height() {
            Some(*self.canvas.get_pixel(x, y))
        } else {
            None
        }
    }

    /// Frames completed with `end_frame`.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.canvas.save(path).map_err(|source| HdUiError::Image {
            path: path.to_path_buf(),
            source,
        })
    }

    fn blend(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return;
        }
        let src_a = color.a.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let dst = self.canvas.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: f32, d: u8| {
            let d = d as f32 / 255.0;
            let v = if out_a > 0.0 {
                (s * src_a + d * dst_a * (1.0 - src_a)) / out_a
            } else {
                0.0
            };
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        };

        *dst = Rgba([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Design-space rectangle to clamped pixel bounds `[x0, x1) x [y0, y1)`.
    fn pixel_bounds(&self, x: f32, y: f32, w: f32, h: f32) -> (i64, i64, i64, i64) {
        let p = self.scaler.point(x, y);
        let e = self.scaler.extent(w, h);
        (
            p.x.round() as i64,
            p.y.round() as i64,
            (p.x + e.x).round() as i64,
            (p.y + e.y).round() as i64,
        )
    }

    fn fill_pixels(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.canvas.width() as i64);
        let y1 = y1.min(self.canvas.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn blit(&mut self, bitmap: &Bitmap, x0: i64, y0: i64, dw: i64, dh: i64, alpha: f32) {
        if dw <= 0 || dh <= 0 || bitmap.width() == 0 || bitmap.height() == 0 {
            return;
        }
        // Only destination pixels on the canvas are visited.
        let (cw, ch) = (self.canvas.width() as i64, self.canvas.height() as i64);
        let (dx0, dx1) = ((-x0).clamp(0, dw), (cw - x0).clamp(0, dw));
        let (dy0, dy1) = ((-y0).clamp(0, dh), (ch - y0).clamp(0, dh));

        for dy in dy0..dy1 {
            let sy = ((dy as f64 + 0.5) * bitmap.height() as f64 / dh as f64) as u32;
            for dx in dx0..dx1 {
                let sx = ((dx as f64 + 0.5) * bitmap.width() as f64 / dw as f64) as u32;
                let Some(src) = bitmap.pixel(sx, sy) else {
                    continue;
                };
                let color = Color::rgba(
                    src[0] as f32 / 255.0,
                    src[1] as f32 / 255.0,
                    src[2] as f32 / 255.0,
                    src[3] as f32 / 255.0 * alpha,
                );
                self.blend(x0 + dx, y0 + dy, color);
            }
        }
    }
}

/// Clip segment `a..b` to the rectangle `min..max` (Liang-Barsky).
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((a + d * t0, a + d * t1))
}

impl Renderer for SoftwareRenderer {
    fn init(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(HdUiError::Backend(format!(
                "invalid display size {}x{}",
                width, height
            )));
        }
        if fullscreen {
            log::debug!("Software renderer ignores fullscreen");
        }
        self.set_display_size(width, height);
        self.initialized = true;
        log::info!("Software renderer initialized at {}x{}", width, height);
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.initialized {
            self.initialized = false;
            log::info!("Software renderer shut down after {} frames", self.frames);
        }
    }

    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {
        self.frames += 1;
    }

    fn clear(&mut self, color: Color) {
        let pixel = Rgba(color.to_rgba8());
        for p in self.canvas.pixels_mut() {
            *p = pixel;
        }
    }

    fn draw_rect_filled(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (x0, y0, x1, y1) = self.pixel_bounds(x, y, w, h);
        self.fill_pixels(x0, y0, x1, y1, color);
    }

    fn draw_rect_outline(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, thickness: f32) {
        let (x0, y0, x1, y1) = self.pixel_bounds(x, y, w, h);
        let t = (thickness.round() as i64).max(1);
        // Bands do not overlap, so translucent strokes blend once per pixel.
        self.fill_pixels(x0, y0, x1, (y0 + t).min(y1), color);
        self.fill_pixels(x0, (y1 - t).max(y0 + t), x1, y1, color);
        self.fill_pixels(x0, y0 + t, (x0 + t).min(x1), y1 - t, color);
        self.fill_pixels((x1 - t).max(x0 + t), y0 + t, x1, y1 - t, color);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, thickness: f32) {
        let half = (thickness.max(1.0) / 2.0).max(0.5);
        let (cw, ch) = (self.canvas.width() as i64, self.canvas.height() as i64);
        let margin = Vec2::splat(half + 1.0);
        let Some((a, b)) = clip_segment(
            self.scaler.point(x1, y1),
            self.scaler.point(x2, y2),
            -margin,
            Vec2::new(cw as f32, ch as f32) + margin,
        ) else {
            return;
        };
        let bx0 = ((a.x.min(b.x) - half).round() as i64).clamp(0, cw);
        let by0 = ((a.y.min(b.y) - half).round() as i64).clamp(0, ch);
        let bx1 = ((a.x.max(b.x) + half).round() as i64 + 1).clamp(0, cw);
        let by1 = ((a.y.max(b.y) + half).round() as i64 + 1).clamp(0, ch);
        let (bw, bh) = (bx1 - bx0, by1 - by0);
        if bw <= 0 || bh <= 0 {
            return;
        }

        // Stamps overlap; the mask keeps translucent lines to one blend per pixel.
        let mut covered = vec![false; (bw * bh) as usize];
        let steps = ((b - a).length() * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            let px0 = (p.x - half).round() as i64;
            let py0 = (p.y - half).round() as i64;
            let px1 = ((p.x + half).round() as i64).max(px0 + 1);
            let py1 = ((p.y + half).round() as i64).max(py0 + 1);
            for py in py0.max(by0)..py1.min(by1) {
                for px in px0.max(bx0)..px1.min(bx1) {
                    covered[((py - by0) * bw + (px - bx0)) as usize] = true;
                }
            }
        }
        for (index, _) in covered.iter().enumerate().filter(|(_, hit)| **hit) {
            let index = index as i64;
            self.blend(bx0 + index % bw, by0 + index / bw, color);
        }
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
        let (x0, y0, x1, y1) = self.pixel_bounds(x, y, w, h);
        let span = match direction {
            GradientDirection::Vertical => (y1 - y0).max(1) as f32,
            GradientDirection::Horizontal => (x1 - x0).max(1) as f32,
        };
        for py in y0.max(0)..y1.min(self.canvas.height() as i64) {
            for px in x0.max(0)..x1.min(self.canvas.width() as i64) {
                let offset = match direction {
                    GradientDirection::Vertical => py - y0,
                    GradientDirection::Horizontal => px - x0,
                };
                let t = (offset as f32 + 0.5) / span;
                self.blend(px, py, start.lerp(end, t));
            }
        }
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
        let Some(face) = self.fonts.get(font) else {
            log::trace!("Font '{}' not registered, skipping text '{}'", font, text);
            return;
        };

        let scale = PxScale::from(size as f32 * self.scaler.factor().y);
        let scaled = face.as_scaled(scale);

        let mut width = 0.0;
        let mut previous = None;
        for c in text.chars() {
            let id = face.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        let origin = self.scaler.point(x, y);
        let mut caret = match align {
            TextAlign::Left => origin.x,
            TextAlign::Center => origin.x - width / 2.0,
            TextAlign::Right => origin.x - width,
        };
        let baseline = origin.y + scaled.ascent();

        let mut coverage = Vec::new();
        let mut previous = None;
        for c in text.chars() {
            let id = face.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            if let Some(outlined) = face.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, c| {
                    coverage.push((
                        bounds.min.x as i64 + gx as i64,
                        bounds.min.y as i64 + gy as i64,
                        c,
                    ));
                });
            }
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        for (px, py, c) in coverage {
            self.blend(px, py, color.fade(c));
        }
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, x: f32, y: f32, alpha: f32) {
        let p = self.scaler.point(x, y);
        self.blit(
            bitmap,
            p.x.round() as i64,
            p.y.round() as i64,
            bitmap.width() as i64,
            bitmap.height() as i64,
            alpha,
        );
    }

    fn draw_bitmap_scaled(&mut self, bitmap: &Bitmap, x: f32, y: f32, w: f32, h: f32, alpha: f32) {
        let (x0, y0, x1, y1) = self.pixel_bounds(x, y, w, h);
        self.blit(bitmap, x0, y0, x1 - x0, y1 - y0, alpha);
    }

    fn scaler(&self) -> Scaler {
        self.scaler
    }

    fn set_base_resolution(&mut self, width: u32, height: u32) {
        self.scaler.set_base_resolution(width, height);
    }

    fn set_display_size(&mut self, width: u32, height: u32) {
        self.scaler.set_display_size(width, height);
        if self.canvas.dimensions() != (width, height) {
            self.canvas = RgbaImage::new(width, height);
        }
    }
}
