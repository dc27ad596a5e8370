//! Character -> glyph record table
//!
//! Built once per character set on the CPU, then uploaded as one
//! R8 texture per glyph for the quad renderer.

use anyhow::{anyhow, Result};
use glow::HasContext;
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};

use crate::font::face::{FontFace, GlyphBitmap};

/// Printable ASCII, preloaded into every table
pub const ASCII_RANGE: std::ops::RangeInclusive<u8> = 0x20..=0x7E;

/// Metrics of one glyph plus its texture
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRecord<T> {
    pub texture: T,
    /// Bitmap size (pixels)
    pub size: (u32, u32),
    /// Offset from pen/baseline to bitmap top-left (pixels, y-up)
    pub bearing: (i32, i32),
    /// Horizontal advance in 1/64 pixel units
    pub advance: u32,
}

/// Immutable glyph lookup, keyed by character
#[derive(Debug, Clone)]
pub struct GlyphTable<T> {
    glyphs: HashMap<char, GlyphRecord<T>>,
    pixel_size: f32,
}

impl<T> GlyphTable<T> {
    #[cfg(test)]
    pub fn from_records(
        pixel_size: f32,
        records: impl IntoIterator<Item = (char, GlyphRecord<T>)>,
    ) -> Self {
        Self {
            glyphs: records.into_iter().collect(),
            pixel_size,
        }
    }

    pub fn get(&self, ch: char) -> Option<&GlyphRecord<T>> {
        self.glyphs.get(&ch)
    }

    #[cfg(test)]
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Em size the table was rasterized at
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }
}

impl GlyphTable<GlyphBitmap> {
    /// Rasterize every distinct character of `chars` at `pixel_size` pixels per em
    pub fn build<F: FontFace + ?Sized>(
        font: &F,
        chars: impl IntoIterator<Item = char>,
        pixel_size: f32,
    ) -> Self {
        let scale = font.scale_for_em_pixels(pixel_size);
        let unique: BTreeSet<char> = chars.into_iter().collect();

        let mut glyphs = HashMap::with_capacity(unique.len());
        for ch in unique {
            let bitmap = font.rasterize(ch, scale);
            let advance = (font.h_metrics(ch).advance_width * scale * 64.0)
                .round()
                .max(0.0) as u32;

            glyphs.insert(
                ch,
                GlyphRecord {
                    size: (bitmap.bbox.width(), bitmap.bbox.height()),
                    bearing: (bitmap.bbox.x0, -bitmap.bbox.y0),
                    advance,
                    texture: bitmap,
                },
            );
        }

        debug!("Glyph table rasterized: {} glyphs at {}px", glyphs.len(), pixel_size);

        Self { glyphs, pixel_size }
    }

    /// Printable ASCII plus the characters of `extra`
    pub fn build_with_ascii<F: FontFace + ?Sized>(
        font: &F,
        extra: &str,
        pixel_size: f32,
    ) -> Self {
        let chars = ASCII_RANGE.map(char::from).chain(extra.chars());
        Self::build(font, chars, pixel_size)
    }

    /// Create one GL texture per glyph
    pub fn upload(&self, gl: &glow::Context) -> Result<GlyphTable<glow::Texture>> {
        let mut glyphs: HashMap<char, GlyphRecord<glow::Texture>> =
            HashMap::with_capacity(self.glyphs.len());

        for (&ch, record) in &self.glyphs {
            let texture = match unsafe { upload_coverage(gl, &record.texture) } {
                Ok(t) => t,
                Err(e) => {
                    // Don't leak the textures created so far
                    for uploaded in glyphs.values() {
                        unsafe { gl.delete_texture(uploaded.texture) };
                    }
                    return Err(anyhow!("Failed to upload glyph {:?}: {}", ch, e));
                }
            };

            glyphs.insert(
                ch,
                GlyphRecord {
                    texture,
                    size: record.size,
                    bearing: record.bearing,
                    advance: record.advance,
                },
            );
        }

        info!(
            "Glyph textures uploaded: {} glyphs at {}px",
            glyphs.len(),
            self.pixel_size
        );

        Ok(GlyphTable {
            glyphs,
            pixel_size: self.pixel_size,
        })
    }
}

impl GlyphTable<glow::Texture> {
    /// Release all glyph textures
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            for record in self.glyphs.values() {
                gl.delete_texture(record.texture);
            }
        }
    }
}

/// Single-channel texture holding one glyph's coverage
///
/// Caller must have set UNPACK_ALIGNMENT to 1.
unsafe fn upload_coverage(
    gl: &glow::Context,
    bitmap: &GlyphBitmap,
) -> Result<glow::Texture, String> {
    let tex = gl.create_texture()?;
    gl.bind_texture(glow::TEXTURE_2D, Some(tex));

    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::R8 as i32,
        bitmap.width as i32,
        bitmap.height as i32,
        0,
        glow::RED,
        glow::UNSIGNED_BYTE,
        if bitmap.coverage.is_empty() {
            None
        } else {
            Some(bitmap.coverage.as_slice())
        },
    );

    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);

    gl.bind_texture(glow::TEXTURE_2D, None);
    Ok(tex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::FakeFace;

    #[test]
    fn test_record_metrics() {
        let font = FakeFace::new();
        // 100px per em -> scale 0.1
        let table = GlyphTable::build(&font, "ab".chars(), 100.0);

        let a = table.get('a').unwrap();
        assert_eq!(a.size, (40, 50));
        assert_eq!(a.bearing, (5, 50));
        // 50px in 1/64 units
        assert_eq!(a.advance, 3200);
        assert_eq!(a.advance >> 6, 50);
        assert_eq!(a.texture.coverage.len(), 40 * 50);

        let g = GlyphTable::build(&font, ['g'], 100.0);
        // Descender: bitmap extends 20px below the baseline
        let g = g.get('g').unwrap();
        assert_eq!(g.bearing.1, 50);
        assert_eq!(g.size.1, 70);
    }

    #[test]
    fn test_keys_unique() {
        let font = FakeFace::new();
        let table = GlyphTable::build(&font, "aaaabbba".chars(), 20.0);
        assert_eq!(table.len(), 2);
        assert!(table.contains('a'));
        assert!(!table.contains('z'));
        assert_eq!(table.pixel_size(), 20.0);
    }

    #[test]
    fn test_ascii_preload() {
        let font = FakeFace::new();
        let table = GlyphTable::build_with_ascii(&font, "é", 48.0);
        assert_eq!(table.len(), 95 + 1);
        assert!(table.contains(' '));
        assert!(table.contains('~'));
        assert!(table.contains('é'));

        let space = table.get(' ').unwrap();
        assert_eq!(space.size, (0, 0));
        assert!(space.advance > 0);
    }
}
