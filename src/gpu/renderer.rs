//! Glyph quad renderer
//!
//! Draws each character as a textured quad: bind the glyph's texture,
//! overwrite the shared 6-vertex buffer, draw, advance the pen.

use anyhow::{anyhow, Result};
use glow::HasContext;
use log::{info, trace};

use crate::font::glyph_table::GlyphTable;
use crate::gpu::quad::{self, VERTEX_FLOATS, VERTICES_PER_GLYPH};
use crate::gpu::shader::TextShader;

/// Owns the VAO/VBO used for every glyph draw
pub struct GlyphQuadRenderer {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

impl GlyphQuadRenderer {
    /// Create vertex array and a dynamic buffer sized for one quad
    pub fn new(gl: &glow::Context) -> Result<Self> {
        unsafe {
            // VAO
            let vao = gl
                .create_vertex_array()
                .map_err(|e| anyhow!("Failed to create VAO: {}", e))?;
            gl.bind_vertex_array(Some(vao));

            // VBO
            let vbo = match gl.create_buffer() {
                Ok(b) => b,
                Err(e) => {
                    gl.bind_vertex_array(None);
                    gl.delete_vertex_array(vao);
                    return Err(anyhow!("Failed to create VBO: {}", e));
                }
            };
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            let vbo_size = VERTICES_PER_GLYPH * VERTEX_FLOATS * std::mem::size_of::<f32>();
            gl.buffer_data_size(glow::ARRAY_BUFFER, vbo_size as i32, glow::DYNAMIC_DRAW);

            // vertex: location=0, vec4 (pos.xy, uv.xy)
            let stride = (VERTEX_FLOATS * std::mem::size_of::<f32>()) as i32;
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, VERTEX_FLOATS as i32, glow::FLOAT, false, stride, 0);

            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);

            info!("Glyph quad renderer initialized");

            Ok(Self { vao, vbo })
        }
    }

    /// Draw `text` with the pen starting at (x, y) on the baseline
    ///
    /// Every character must be in `table`; nothing is drawn otherwise.
    /// Returns the pen x after the last glyph.
    #[allow(clippy::too_many_arguments)]
    pub fn render_text(
        &self,
        gl: &glow::Context,
        shader: &TextShader,
        table: &GlyphTable<glow::Texture>,
        text: &str,
        x: f32,
        y: f32,
        scale: f32,
        color: [f32; 3],
    ) -> Result<f32> {
        let (quads, pen_x) = quad::layout_text(table, text, x, y, scale)?;

        unsafe {
            shader.bind(gl);
            shader.set_text_color(gl, color);
            shader.set_texture_unit(gl, 0);

            gl.active_texture(glow::TEXTURE0);
            gl.bind_vertex_array(Some(self.vao));

            let mut drawn = 0usize;
            for q in &quads {
                // Space and other blank glyphs only move the pen
                if q.rect.is_empty() {
                    continue;
                }

                trace!(
                    "glyph {:?} at ({:.1}, {:.1}) {}x{}",
                    q.ch,
                    q.rect.left,
                    q.rect.bottom,
                    q.rect.width,
                    q.rect.height
                );
                let vertices = q.rect.vertices();

                gl.bind_texture(glow::TEXTURE_2D, Some(*q.texture));

                gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
                gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, cast_slice(&vertices));
                gl.bind_buffer(glow::ARRAY_BUFFER, None);

                gl.draw_arrays(glow::TRIANGLES, 0, VERTICES_PER_GLYPH as i32);
                drawn += 1;
            }

            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);

            trace!("render_text: {} glyphs drawn, pen {:.1} -> {:.1}", drawn, x, pen_x);
        }

        Ok(pen_x)
    }

    /// Release resources
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}

/// View quad vertices as raw bytes for upload
fn cast_slice(vertices: &[[f32; VERTEX_FLOATS]; VERTICES_PER_GLYPH]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            vertices.as_ptr() as *const u8,
            std::mem::size_of_val(vertices),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_slice_len() {
        let v = [[0.0f32; VERTEX_FLOATS]; VERTICES_PER_GLYPH];
        assert_eq!(cast_slice(&v).len(), 6 * 4 * 4);

        let mut v = v;
        v[0][0] = 1.0;
        assert_eq!(&cast_slice(&v)[..4], &1.0f32.to_ne_bytes());
    }
}
