//! Global constants for glyphbake
//!
//! Built-in defaults for window, paths and text sizes.

// ============================================================================
// Window
// ============================================================================

/// Window width in pixels
pub const SCR_WIDTH: u32 = 800;

/// Window height in pixels
pub const SCR_HEIGHT: u32 = 600;

pub const WINDOW_TITLE: &str = "Text rendering";

// ============================================================================
// Paths (relative to the working directory)
// ============================================================================

pub const DEFAULT_FONT_PATH: &str = "resources/fonts/verdana.ttf";

pub const DEFAULT_PNG_PATH: &str = "resources/textures/image.png";

// ============================================================================
// Text
// ============================================================================

/// Text baked into the PNG
pub const DEFAULT_BAKE_TEXT: &str = " text ";

/// Text bitmap height (ascent - descent), 48px at 2x
pub const DEFAULT_PIXEL_HEIGHT: f32 = 48.0 * 2.0;

/// Em size for glyph table textures
pub const DEFAULT_GLYPH_PIXEL_SIZE: f32 = 48.0;
