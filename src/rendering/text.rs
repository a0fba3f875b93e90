//! Text outlines for raster painting.
//!
//! Glyphs are laid out unshaped, one advance per character, and turned into
//! `tiny_skia` paths. Characters the face has no glyph for advance by half
//! the font size and draw nothing.

use std::borrow::Cow;
use std::path::Path as FsPath;

use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, OutlineBuilder};

use crate::{Error, Result};

static DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// A TrueType/OpenType face used for all dashboard text.
#[derive(Debug, Clone)]
pub struct Font {
    data: Cow<'static, [u8]>,
}

impl Default for Font {
    /// The bundled DejaVu Sans face.
    fn default() -> Self {
        Self {
            data: Cow::Borrowed(DEJAVU_SANS),
        }
    }
}

impl Font {
    /// Load a face from a font file, rejecting data `ttf_parser` cannot read.
    pub fn from_file(path: impl AsRef<FsPath>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Face::parse(&bytes, 0)
            .map_err(|e| Error::RenderError(format!("Failed to parse font {}: {}", path.display(), e)))?;
        Ok(Self {
            data: Cow::Owned(bytes),
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }

    /// Horizontal advance of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        text.chars().map(|c| advance(&face, c, size)).sum()
    }

    /// Longest prefix of `text` that fits in `max_width`.
    pub fn truncate(&self, text: &str, size: f32, max_width: f32) -> String {
        let Some(face) = self.face() else {
            return String::new();
        };
        let mut pen = 0.0;
        text.chars()
            .take_while(|c| {
                pen += advance(&face, *c, size);
                pen <= max_width
            })
            .collect()
    }

    /// Greedy word wrap. A word wider than `max_width` gets a line of its own.
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let space = self.measure(" ", size);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut width = 0.0;

        for word in text.split_whitespace() {
            let w = self.measure(word, size);
            if !current.is_empty() && width + space + w > max_width {
                lines.push(std::mem::take(&mut current));
                width = 0.0;
            }
            if !current.is_empty() {
                current.push(' ');
                width += space;
            }
            current.push_str(word);
            width += w;
        }
        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Outline of `text` with its baseline starting at `(x, baseline)`, in
    /// y-down canvas coordinates, plus the total advance.
    pub fn outline(&self, text: &str, x: f32, baseline: f32, size: f32) -> (Option<Path>, f32) {
        let Some(face) = self.face() else {
            return (None, 0.0);
        };
        let scale = size / face.units_per_em().max(1) as f32;
        let mut builder = GlyphPathBuilder {
            builder: PathBuilder::new(),
            origin_x: x,
            origin_y: baseline,
            scale,
        };

        let mut pen = 0.0;
        for c in text.chars() {
            if let Some(gid) = face.glyph_index(c) {
                builder.origin_x = x + pen;
                let _ = face.outline_glyph(gid, &mut builder);
            }
            pen += advance(&face, c, size);
        }
        (builder.builder.finish(), pen)
    }
}

fn advance(face: &Face<'_>, c: char, size: f32) -> f32 {
    let units = face.units_per_em().max(1) as f32;
    match face.glyph_index(c).and_then(|g| face.glyph_hor_advance(g)) {
        Some(adv) if adv > 0 => adv as f32 / units * size,
        _ => size * 0.5,
    }
}

/// Feeds font-unit outlines (y-up) into a y-down path at a pen origin.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_font_measures_text() {
        let font = Font::default();
        let narrow = font.measure("iii", 12.0);
        let wide = font.measure("WWW", 12.0);
        assert!(narrow > 0.0);
        assert!(wide > narrow);
        assert!((font.measure("ab", 24.0) - 2.0 * font.measure("ab", 12.0)).abs() < 1e-3);
    }

    #[test]
    fn outline_has_bounds_above_baseline() {
        let (path, adv) = Font::default().outline("Hi", 10.0, 50.0, 20.0);
        let bounds = path.unwrap().bounds();
        assert!(bounds.bottom() <= 50.5);
        assert!(bounds.top() < 50.0 - 10.0);
        assert!(bounds.left() >= 10.0);
        assert!(adv > 0.0);
    }

    #[test]
    fn whitespace_has_no_outline() {
        let (path, adv) = Font::default().outline("   ", 0.0, 10.0, 10.0);
        assert!(path.is_none());
        assert!(adv > 0.0);
    }

    #[test]
    fn wrap_breaks_on_words() {
        let font = Font::default();
        let text = "uno dos tres cuatro cinco seis siete ocho";
        let max = font.measure("uno dos tres", 10.0) + 1.0;
        let lines = font.wrap(text, 10.0, max);
        assert!(lines.len() > 1);
        assert_eq!(lines[0], "uno dos tres");
        assert_eq!(lines.join(" "), text);
        assert!(lines.iter().all(|l| font.measure(l, 10.0) <= max));
    }

    #[test]
    fn truncate_fits_width() {
        let font = Font::default();
        let cut = font.truncate("Esta será la línea 1", 10.0, 30.0);
        assert!(!cut.is_empty());
        assert!(font.measure(&cut, 10.0) <= 30.0);
        assert!("Esta será la línea 1".starts_with(&cut));
    }

    #[test]
    fn unreadable_font_file_rejected() {
        let path = std::env::temp_dir().join(format!("newsboard-font-{}.ttf", std::process::id()));
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(Font::from_file(&path), Err(Error::RenderError(_))));
        std::fs::remove_file(&path).ok();
    }
}
