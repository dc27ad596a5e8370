//! Text bitmap builder
//!
//! Lays out a single line of text left to right with kerning and
//! composites every glyph's coverage into one shared R8 bitmap
//! sized to fit the whole string.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::TextError;
use crate::font::face::{FontFace, GlyphBitmap};

/// What to do with a glyph whose box leaves the bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Write only the in-bounds part of the glyph
    #[default]
    Clip,
    /// Fail with `TextError::BitmapOverflow`
    Reject,
}

/// 8-bit greyscale bitmap, row stride == width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Zero-filled bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Coverage at (x, y), None outside the bitmap
    #[cfg(test)]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Composite glyph coverage with its top-left corner at (x, y)
    ///
    /// Pixels keep the maximum of existing and new coverage so that
    /// kerned glyphs sharing columns don't erase each other.
    /// Returns the number of glyph pixels that fell outside the bitmap.
    fn blit(
        &mut self,
        glyph: &GlyphBitmap,
        x: i32,
        y: i32,
        ch: char,
        policy: OverflowPolicy,
    ) -> Result<u64, TextError> {
        let bw = self.width as i64;
        let bh = self.height as i64;
        let gw = glyph.width as i64;
        let gh = glyph.height as i64;
        let (x, y) = (x as i64, y as i64);

        let inside = x >= 0 && y >= 0 && x + gw <= bw && y + gh <= bh;
        if !inside && gw > 0 && gh > 0 && policy == OverflowPolicy::Reject {
            return Err(TextError::BitmapOverflow {
                ch,
                x: x as i32,
                y: y as i32,
                width: glyph.width,
                height: glyph.height,
                bitmap_width: self.width,
                bitmap_height: self.height,
            });
        }

        // Intersection of glyph rectangle and bitmap, in glyph coordinates
        let col_start = (-x).clamp(0, gw);
        let col_end = (bw - x).clamp(0, gw);
        let row_start = (-y).clamp(0, gh);
        let row_end = (bh - y).clamp(0, gh);

        let mut written = 0u64;
        for row in row_start..row_end {
            for col in col_start..col_end {
                let Some(&value) = glyph.coverage.get((row * gw + col) as usize) else {
                    continue;
                };
                let px = &mut self.pixels[((y + row) * bw + x + col) as usize];
                *px = (*px).max(value);
                written += 1;
            }
        }

        Ok((gw * gh) as u64 - written)
    }
}

#[inline]
fn round_px(v: f32) -> i32 {
    v.round() as i32
}

/// Pen stops for each character plus the final pen position
///
/// Both the bitmap width and glyph placement come from here,
/// so they can never disagree on rounding.
pub fn pen_positions<F: FontFace + ?Sized>(font: &F, chars: &[char], scale: f32) -> Vec<i32> {
    let mut stops = Vec::with_capacity(chars.len() + 1);
    let mut x = 0i32;
    stops.push(x);

    for (i, &ch) in chars.iter().enumerate() {
        x += round_px(font.h_metrics(ch).advance_width * scale);
        if let Some(&next) = chars.get(i + 1) {
            x += round_px(font.kern_advance(ch, next) * scale);
        }
        stops.push(x);
    }

    stops
}

/// Rasterize `text` into one bitmap of `pixel_height` (ascent - descent) pixels
pub fn build_atlas<F: FontFace + ?Sized>(
    font: &F,
    text: &str,
    pixel_height: f32,
    policy: OverflowPolicy,
) -> Result<Bitmap, TextError> {
    let scale = font.scale_for_pixel_height(pixel_height);
    let vm = font.vertical_metrics();

    let height = round_px((vm.ascent - vm.descent) * scale).max(0) as u32;
    let baseline = round_px(vm.ascent * scale);

    let chars: Vec<char> = text.chars().collect();
    let stops = pen_positions(font, &chars, scale);
    let width = stops.last().copied().unwrap_or(0).max(0) as u32;

    debug!(
        "Text bitmap: {:?} at {}px, scale={:.5}, {}x{}, baseline={}",
        text, pixel_height, scale, width, height, baseline
    );

    let mut bitmap = Bitmap::new(width, height);
    let mut clipped = 0u64;

    for (&ch, &pen_x) in chars.iter().zip(stops.iter()) {
        let hm = font.h_metrics(ch);
        let glyph = font.rasterize(ch, scale);

        let x = pen_x + round_px(hm.left_side_bearing * scale);
        let y = baseline + glyph.bbox.y0;

        let lost = bitmap.blit(&glyph, x, y, ch, policy)?;
        if lost > 0 {
            debug!(
                "Glyph {:?} clipped: {} of {} pixels outside bitmap",
                ch,
                lost,
                glyph.width * glyph.height
            );
            clipped += lost;
        }
    }

    info!(
        "Text bitmap built: {}x{}, {} glyphs, {} pixels clipped",
        bitmap.width,
        bitmap.height,
        chars.len(),
        clipped
    );

    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::{FakeFace, FAKE_CHARSET};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// scale = 0.1 for the fake face
    const PX: f32 = 100.0;

    fn expected_width(font: &FakeFace, text: &str) -> i32 {
        let scale = font.scale_for_pixel_height(PX);
        let chars: Vec<char> = text.chars().collect();
        let advances: i32 = chars
            .iter()
            .map(|&c| (font.h_metrics(c).advance_width * scale).round() as i32)
            .sum();
        let kerning: i32 = chars
            .windows(2)
            .map(|w| (font.kern_advance(w[0], w[1]) * scale).round() as i32)
            .sum();
        advances + kerning
    }

    #[test]
    fn test_dimensions() {
        let font = FakeFace::new();
        for text in ["a", "ab", "aja", "Wab", " text "] {
            let bitmap = build_atlas(&font, text, PX, OverflowPolicy::Clip).unwrap();
            assert_eq!(bitmap.width as i32, expected_width(&font, text), "{text:?}");
            assert_eq!(bitmap.height, 100);
            assert_eq!(bitmap.pixels.len(), (bitmap.width * bitmap.height) as usize);
        }
    }

    #[test]
    fn test_kerning_in_width() {
        let font = FakeFace::new();
        // 50 + (-4) + 25
        let bitmap = build_atlas(&font, "aj", PX, OverflowPolicy::Clip).unwrap();
        assert_eq!(bitmap.width, 71);
    }

    #[test]
    fn test_pen_positions() {
        let font = FakeFace::new();
        let chars: Vec<char> = "Wab".chars().collect();
        // W: 90, kern(W,a) = -6, a: 50, b: 55
        assert_eq!(pen_positions(&font, &chars, 0.1), vec![0, 84, 134, 189]);
        assert_eq!(pen_positions(&font, &[], 0.1), vec![0]);
    }

    #[test]
    fn test_empty_text() {
        let font = FakeFace::new();
        let bitmap = build_atlas(&font, "", PX, OverflowPolicy::Reject).unwrap();
        assert_eq!(bitmap.width, 0);
        assert_eq!(bitmap.height, 100);
        assert!(bitmap.is_empty());
    }

    #[test]
    fn test_glyph_placement() {
        let font = FakeFace::new();
        let bitmap = build_atlas(&font, "ab", PX, OverflowPolicy::Reject).unwrap();

        // 'a' covers columns 5..45, rows 30..80 (baseline 80)
        assert_eq!(bitmap.get(5, 30), Some(255));
        assert_eq!(bitmap.get(44, 79), Some(255));
        assert_eq!(bitmap.get(4, 30), Some(0));
        assert_eq!(bitmap.get(5, 29), Some(0));
        assert_eq!(bitmap.get(5, 80), Some(0));

        // 'b' starts at pen 50 + lsb 6, rows 5..80
        assert_eq!(bitmap.get(56, 5), Some(255));
        assert_eq!(bitmap.get(99, 79), Some(255));
        assert_eq!(bitmap.get(55, 5), Some(0));
        assert_eq!(bitmap.get(100, 5), Some(0));

        assert_eq!(bitmap.get(105, 0), None);
    }

    #[test]
    fn test_descender_reaches_bottom() {
        let font = FakeFace::new();
        let bitmap = build_atlas(&font, "g", PX, OverflowPolicy::Reject).unwrap();
        // 'g' spans rows 30..100
        assert_eq!(bitmap.get(4, 99), Some(255));
        assert_eq!(bitmap.get(4, 29), Some(0));
    }

    #[test]
    fn test_overlapping_glyphs_keep_coverage() {
        let font = FakeFace::new();
        // 'j' at 46 - 8 = 38 overlaps 'a' columns 38..45
        let bitmap = build_atlas(&font, "aj", PX, OverflowPolicy::Reject).unwrap();
        assert_eq!(bitmap.get(40, 50), Some(255));
        assert_eq!(bitmap.get(40, 15), Some(255));
    }

    #[test]
    fn test_negative_bearing_reject() {
        let font = FakeFace::new();
        let err = build_atlas(&font, "ja", PX, OverflowPolicy::Reject).unwrap_err();
        match err {
            TextError::BitmapOverflow { ch, x, .. } => {
                assert_eq!(ch, 'j');
                assert_eq!(x, -8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_bearing_clip() {
        let font = FakeFace::new();
        let bitmap = build_atlas(&font, "ja", PX, OverflowPolicy::Clip).unwrap();
        // Visible part of 'j' starts at column 0
        assert_eq!(bitmap.get(0, 50), Some(255));
    }

    #[test]
    fn test_overhang_reject() {
        let font = FakeFace::new();
        // 'W' is 92 pixels wide but advances 90
        assert!(matches!(
            build_atlas(&font, "W", PX, OverflowPolicy::Reject),
            Err(TextError::BitmapOverflow { ch: 'W', .. })
        ));
    }

    #[test]
    fn test_deterministic() {
        let font = FakeFace::new();
        let a = build_atlas(&font, " jab Wg ", PX, OverflowPolicy::Clip).unwrap();
        let b = build_atlas(&font, " jab Wg ", PX, OverflowPolicy::Clip).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_strings_stay_in_bounds() {
        let font = FakeFace::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..500 {
            let len = rng.random_range(0..16);
            let text: String = (0..len)
                .map(|_| {
                    if rng.random_range(0..10) == 0 {
                        // Outside the fake charset, uses the fallback glyph
                        'Q'
                    } else {
                        FAKE_CHARSET[rng.random_range(0..FAKE_CHARSET.len())]
                    }
                })
                .collect();
            let px = rng.random_range(8.0..160.0f32);

            let bitmap = build_atlas(&font, &text, px, OverflowPolicy::Clip).unwrap();
            assert_eq!(
                bitmap.pixels.len(),
                bitmap.width as usize * bitmap.height as usize
            );

            match build_atlas(&font, &text, px, OverflowPolicy::Reject) {
                Ok(strict) => assert_eq!(strict, bitmap),
                Err(TextError::BitmapOverflow { .. }) => {}
                Err(other) => panic!("unexpected error for {text:?}: {other}"),
            }
        }
    }
}
