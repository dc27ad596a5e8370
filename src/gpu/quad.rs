//! Glyph quad geometry
//!
//! Pure layout for the quad renderer: one textured triangle pair per
//! glyph, pen advanced by the glyph's 1/64 pixel advance.

use crate::error::TextError;
use crate::font::glyph_table::{GlyphRecord, GlyphTable};

/// Per-vertex data: position(2) + UV(2) = 4 floats
pub const VERTEX_FLOATS: usize = 4;
/// 1 glyph = 6 vertices (2 triangles, no index buffer)
pub const VERTICES_PER_GLYPH: usize = 6;

/// Screen rectangle of one glyph (pixels, y-up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadRect {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl QuadRect {
    /// Quad for `record` with the pen at (x, y) on the baseline
    pub fn for_glyph<T>(record: &GlyphRecord<T>, x: f32, y: f32, scale: f32) -> Self {
        let (w, h) = (record.size.0 as f32, record.size.1 as f32);
        let (bx, by) = (record.bearing.0 as f32, record.bearing.1 as f32);
        Self {
            left: x + bx * scale,
            bottom: y - (h - by) * scale,
            width: w * scale,
            height: h * scale,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Two counter-clockwise triangles, uv (0,0) at the glyph's top-left
    pub fn vertices(&self) -> [[f32; VERTEX_FLOATS]; VERTICES_PER_GLYPH] {
        let (x0, y0) = (self.left, self.bottom);
        let (x1, y1) = (self.left + self.width, self.bottom + self.height);

        #[rustfmt::skip]
        let v = [
            [x0, y1, 0.0, 0.0],
            [x0, y0, 0.0, 1.0],
            [x1, y0, 1.0, 1.0],

            [x0, y1, 0.0, 0.0],
            [x1, y0, 1.0, 1.0],
            [x1, y1, 1.0, 0.0],
        ];
        v
    }
}

/// Pen movement for a glyph: whole pixels of the 26.6 advance, scaled
#[inline]
pub fn pen_advance<T>(record: &GlyphRecord<T>, scale: f32) -> f32 {
    (record.advance >> 6) as f32 * scale
}

/// One positioned glyph ready to draw
#[derive(Debug)]
pub struct GlyphQuad<'a, T> {
    pub ch: char,
    pub texture: &'a T,
    pub rect: QuadRect,
}

/// Lay out `text` starting at pen (x, y)
///
/// Fails on the first character missing from `table`, before anything is drawn.
/// Returns the quads and the final pen x.
pub fn layout_text<'a, T>(
    table: &'a GlyphTable<T>,
    text: &str,
    x: f32,
    y: f32,
    scale: f32,
) -> Result<(Vec<GlyphQuad<'a, T>>, f32), TextError> {
    let mut pen_x = x;
    let mut quads = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let record = table.get(ch).ok_or(TextError::GlyphLookup { ch })?;

        quads.push(GlyphQuad {
            ch,
            texture: &record.texture,
            rect: QuadRect::for_glyph(record, pen_x, y, scale),
        });

        pen_x += pen_advance(record, scale);
    }

    Ok((quads, pen_x))
}
