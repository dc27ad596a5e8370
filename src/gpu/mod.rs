//! GPU rendering with OpenGL
//!
//! Handles:
//! - Window and OpenGL 3.3 core context creation
//! - Glyph quad shader
//! - Per-glyph textured quad drawing

pub mod context;
pub mod quad;
pub mod renderer;
pub mod shader;

pub use context::GlWindow;
pub use renderer::GlyphQuadRenderer;
pub use shader::TextShader;
