//! Font loading and glyph rasterization
//!
//! Handles:
//! - TTF/OTF font loading (fontdue)
//! - Single-line text bitmap with kerning
//! - Character -> glyph record table for the quad renderer

pub mod atlas;
pub mod face;
pub mod glyph_table;

#[cfg(test)]
pub mod testing;

pub use atlas::{build_atlas, Bitmap, OverflowPolicy};
pub use face::{FontdueFace, GlyphBitmap};
pub use glyph_table::GlyphTable;
