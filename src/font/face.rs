//! Font face abstraction
//!
//! Metrics are reported in font design units unless a scale is passed in,
//! bounding boxes use a y-down axis with the baseline at y = 0.
//! `FontdueFace` is the production implementation.

use fontdue::{Font, FontSettings, Metrics};
use log::{debug, info};
use std::path::Path;

use crate::error::TextError;

/// Vertical font metrics (font units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VMetrics {
    /// Distance from baseline to top of tallest glyph (positive)
    pub ascent: f32,
    /// Distance from baseline to bottom of lowest glyph (negative)
    pub descent: f32,
    pub line_gap: f32,
}

/// Horizontal glyph metrics (font units)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HMetrics {
    pub advance_width: f32,
    pub left_side_bearing: f32,
}

/// Pixel bounding box of a glyph at a given scale
///
/// y-down: `y0` is the top row relative to the baseline (usually negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl GlyphBox {
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }
}

/// Rasterized coverage of one glyph (row-major, top row first)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphBitmap {
    pub bbox: GlyphBox,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

/// Everything the atlas builder and glyph table need from a font
pub trait FontFace {
    /// Scale so that ascent - descent spans `pixel_height` pixels
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32;

    /// Scale so that one em spans `pixels` pixels
    fn scale_for_em_pixels(&self, pixels: f32) -> f32;

    fn vertical_metrics(&self) -> VMetrics;

    fn h_metrics(&self, ch: char) -> HMetrics;

    /// Kerning adjustment between two adjacent characters (font units)
    fn kern_advance(&self, left: char, right: char) -> f32;

    fn rasterize(&self, ch: char, scale: f32) -> GlyphBitmap;
}

/// TrueType/OpenType face backed by fontdue
pub struct FontdueFace {
    font: Font,
    units_per_em: f32,
    vmetrics: VMetrics,
}

impl FontdueFace {
    /// Read a font file fully into memory and parse it
    pub fn load(path: &Path) -> Result<Self, TextError> {
        let data = std::fs::read(path).map_err(|source| TextError::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Font loaded: {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, TextError> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| TextError::FontParse(e.to_string()))?;

        let units_per_em = font.units_per_em();
        // Metrics at px == units_per_em come back unscaled
        let line = font
            .horizontal_line_metrics(units_per_em)
            .ok_or_else(|| TextError::FontParse("font has no horizontal line metrics".into()))?;

        let vmetrics = VMetrics {
            ascent: line.ascent,
            descent: line.descent,
            line_gap: line.line_gap,
        };

        debug!(
            "Font metrics: units_per_em={}, ascent={}, descent={}, line_gap={}",
            units_per_em, vmetrics.ascent, vmetrics.descent, vmetrics.line_gap
        );

        Ok(Self {
            font,
            units_per_em,
            vmetrics,
        })
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }
}

fn glyph_box(m: &Metrics) -> GlyphBox {
    // fontdue's ymin is the bottom edge, y-up
    GlyphBox {
        x0: m.xmin,
        y0: -(m.ymin + m.height as i32),
        x1: m.xmin + m.width as i32,
        y1: -m.ymin,
    }
}

impl FontFace for FontdueFace {
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 {
        let span = self.vmetrics.ascent - self.vmetrics.descent;
        if span <= 0.0 {
            return 0.0;
        }
        pixel_height / span
    }

    fn scale_for_em_pixels(&self, pixels: f32) -> f32 {
        pixels / self.units_per_em
    }

    fn vertical_metrics(&self) -> VMetrics {
        self.vmetrics
    }

    fn h_metrics(&self, ch: char) -> HMetrics {
        let m = self.font.metrics(ch, self.units_per_em);
        HMetrics {
            advance_width: m.advance_width,
            left_side_bearing: m.bounds.xmin,
        }
    }

    fn kern_advance(&self, left: char, right: char) -> f32 {
        self.font
            .horizontal_kern(left, right, self.units_per_em)
            .unwrap_or(0.0)
    }

    fn rasterize(&self, ch: char, scale: f32) -> GlyphBitmap {
        let (m, coverage) = self.font.rasterize(ch, scale * self.units_per_em);
        GlyphBitmap {
            bbox: glyph_box(&m),
            width: m.width as u32,
            height: m.height as u32,
            coverage,
        }
    }
}
