//! Error kinds for font loading, glyph layout and image export
//!
//! GL and window setup use `anyhow` directly; everything that deals with
//! font data, bitmaps and glyph tables reports one of these.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    /// Font file could not be read
    #[error("failed to read font file {}: {source}", path.display())]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Font bytes were rejected by the parser
    #[error("failed to parse font: {0}")]
    FontParse(String),

    /// Character has no entry in the glyph table
    #[error("no glyph record for {ch:?}")]
    GlyphLookup { ch: char },

    /// Glyph box does not fit inside the destination bitmap
    #[error(
        "glyph {ch:?} at ({x}, {y}) size {width}x{height} exceeds {bitmap_width}x{bitmap_height} bitmap"
    )]
    BitmapOverflow {
        ch: char,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        bitmap_width: u32,
        bitmap_height: u32,
    },

    /// PNG cannot hold a bitmap without pixels
    #[error("cannot encode an empty {width}x{height} bitmap")]
    EmptyBitmap { width: u32, height: u32 },

    #[error("failed to write image {}: {source}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] png::EncodingError),
}
