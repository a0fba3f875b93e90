//! Paint commands for page decorations and a `tiny_skia` raster canvas

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};

use super::text::Font;
use super::RasterImage;
use crate::{Error, Result, Rgb};

/// Vertical anchor of a text command's `y` coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    /// `y` is the top of the glyph box
    Top,
    /// `y` is the bottom of the glyph box
    Bottom,
}

/// Vector drawing operations in page pixels, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rgb: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        size: f32,
        baseline: TextBaseline,
    },
    Image {
        image: Arc<RasterImage>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Blend `rgb` at `alpha` over a white background.
pub fn tint(rgb: (u8, u8, u8), alpha: f32) -> Rgba<u8> {
    let mix = |c: u8| (255.0 + (c as f32 - 255.0) * alpha).round() as u8;
    Rgba([mix(rgb.0), mix(rgb.1), mix(rgb.2), 255])
}

pub fn opaque(rgb: (u8, u8, u8)) -> Rgba<u8> {
    Rgba([rgb.0, rgb.1, rgb.2, 255])
}

fn fill_paint(color: Rgba<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;
    paint
}

/// Immediate-mode canvas over a `tiny_skia::Pixmap`. Everything is drawn as
/// anti-aliased paths and converted to a [`RasterImage`] once at the end.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Result<Self> {
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::RenderError(format!("invalid canvas size {}x{}", width, height)))?;
        pixmap.fill(Color::from_rgba8(background[0], background[1], background[2], background[3]));
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_path(&mut self, path: &Path, color: Rgba<u8>) {
        self.pixmap
            .fill_path(path, &fill_paint(color), FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &Path, color: Rgba<u8>, width: f32) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &fill_paint(color), &stroke, Transform::identity(), None);
    }

    /// Degenerate rectangles draw nothing.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        if let Some(rect) = Rect::from_xywh(x, y, width, height) {
            self.pixmap
                .fill_rect(rect, &fill_paint(color), Transform::identity(), None);
        }
    }

    /// One-pixel outline just inside the rectangle.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        if let Some(rect) = Rect::from_xywh(x + 0.5, y + 0.5, width - 1.0, height - 1.0) {
            self.stroke_path(&PathBuilder::from_rect(rect), color, 1.0);
        }
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>) {
        self.polyline(&[(x0, y0), (x1, y1)], color, 1.0);
    }

    pub fn polyline(&mut self, points: &[(f32, f32)], color: Rgba<u8>, width: f32) {
        let Some(((x, y), rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(*x, *y);
        for (x, y) in rest {
            pb.line_to(*x, *y);
        }
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, color, width);
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba<u8>) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.fill_path(&path, color);
        }
    }

    /// Fill the pie wedge between `start` and `end` radians (clockwise from 12 o'clock).
    pub fn fill_wedge(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, color: Rgba<u8>) {
        let sweep = end - start;
        if sweep <= 0.0 || radius <= 0.0 {
            return;
        }
        let steps = (sweep / std::f32::consts::TAU * 128.0).ceil().max(1.0) as usize;
        let mut pb = PathBuilder::new();
        pb.move_to(cx, cy);
        for i in 0..=steps {
            let a = start + sweep * i as f32 / steps as f32;
            pb.line_to(cx + radius * a.sin(), cy - radius * a.cos());
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.fill_path(&path, color);
        }
    }

    /// Draw `text` with its baseline at `baseline`, returning the advance.
    pub fn text(&mut self, font: &Font, x: f32, baseline: f32, text: &str, size: f32, color: Rgba<u8>) -> f32 {
        let (path, advance) = font.outline(text, x, baseline, size);
        if let Some(path) = path {
            self.fill_path(&path, color);
        }
        advance
    }

    pub fn into_raster(self) -> Result<RasterImage> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let data: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(width, height, data)
            .map(RasterImage::new)
            .ok_or_else(|| Error::RenderError("canvas buffer does not match its size".into()))
    }
}
