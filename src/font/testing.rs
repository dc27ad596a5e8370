//! Synthetic font face with hand-picked metrics for unit tests

use std::collections::HashMap;

use super::face::{FontFace, GlyphBitmap, GlyphBox, HMetrics, VMetrics};

/// Outline extents of one fake glyph (font units, y-up)
#[derive(Debug, Clone, Copy)]
struct FakeGlyph {
    advance: f32,
    lsb: f32,
    x_min: f32,
    y_min: f32,
    x_max: f32,
    y_max: f32,
}

/// 1000 units per em, ascent 800, descent -200
///
/// Every glyph rasterizes to a solid 255 box covering its bounding box.
/// 'j' has a negative left-side bearing and 'W' overhangs its advance.
pub struct FakeFace {
    glyphs: HashMap<char, FakeGlyph>,
    kerning: HashMap<(char, char), f32>,
    fallback: FakeGlyph,
}

pub const FAKE_CHARSET: &[char] = &['a', 'b', 'g', 'j', ' ', 'W'];

impl FakeFace {
    pub fn new() -> Self {
        let g = |advance, lsb, x_max, y_min, y_max| FakeGlyph {
            advance,
            lsb,
            x_min: lsb,
            y_min,
            x_max,
            y_max,
        };

        let mut glyphs = HashMap::new();
        glyphs.insert('a', g(500.0, 50.0, 450.0, 0.0, 500.0));
        glyphs.insert('b', g(550.0, 60.0, 500.0, 0.0, 750.0));
        glyphs.insert('g', g(520.0, 40.0, 480.0, -200.0, 500.0));
        glyphs.insert('j', g(250.0, -80.0, 200.0, -200.0, 700.0));
        glyphs.insert('W', g(900.0, -10.0, 910.0, 0.0, 700.0));
        glyphs.insert(
            ' ',
            FakeGlyph {
                advance: 280.0,
                lsb: 0.0,
                x_min: 0.0,
                y_min: 0.0,
                x_max: 0.0,
                y_max: 0.0,
            },
        );

        let mut kerning = HashMap::new();
        kerning.insert(('a', 'j'), -40.0);
        kerning.insert(('W', 'a'), -60.0);

        Self {
            glyphs,
            kerning,
            fallback: g(600.0, 50.0, 550.0, 0.0, 700.0),
        }
    }

    fn glyph(&self, ch: char) -> FakeGlyph {
        self.glyphs.get(&ch).copied().unwrap_or(self.fallback)
    }

    /// Pixel box of the outline, rounded outwards
    fn bitmap_box(&self, ch: char, scale: f32) -> GlyphBox {
        let g = self.glyph(ch);
        if g.x_max <= g.x_min || g.y_max <= g.y_min {
            return GlyphBox::default();
        }
        GlyphBox {
            x0: (g.x_min * scale).floor() as i32,
            y0: -(g.y_max * scale).ceil() as i32,
            x1: (g.x_max * scale).ceil() as i32,
            y1: -(g.y_min * scale).floor() as i32,
        }
    }
}

impl FontFace for FakeFace {
    fn scale_for_pixel_height(&self, pixel_height: f32) -> f32 {
        pixel_height / 1000.0
    }

    fn scale_for_em_pixels(&self, pixels: f32) -> f32 {
        pixels / 1000.0
    }

    fn vertical_metrics(&self) -> VMetrics {
        VMetrics {
            ascent: 800.0,
            descent: -200.0,
            line_gap: 0.0,
        }
    }

    fn h_metrics(&self, ch: char) -> HMetrics {
        let g = self.glyph(ch);
        HMetrics {
            advance_width: g.advance,
            left_side_bearing: g.lsb,
        }
    }

    fn kern_advance(&self, left: char, right: char) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    fn rasterize(&self, ch: char, scale: f32) -> GlyphBitmap {
        let bbox = self.bitmap_box(ch, scale);
        let (width, height) = (bbox.width(), bbox.height());
        GlyphBitmap {
            bbox,
            width,
            height,
            coverage: vec![255; (width * height) as usize],
        }
    }
}
