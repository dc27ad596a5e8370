//! Shader management
//!
//! GLSL 3.30 core shader compilation and linking

use anyhow::{anyhow, Result};
use glow::HasContext;
use log::info;

/// Glyph quad vertex shader (GLSL 3.30 core)
///
/// Input:
///   vertex: xy = position (pixels), zw = texture coordinates
/// Uniform:
///   projection: Orthographic projection matrix
const TEXT_VERTEX_SHADER: &str = r#"#version 330 core
layout(location = 0) in vec4 vertex;

uniform mat4 projection;

out vec2 TexCoords;

void main() {
    gl_Position = projection * vec4(vertex.xy, 0.0, 1.0);
    TexCoords = vertex.zw;
}
"#;

/// Glyph quad fragment shader
///
/// Glyph texture R channel is coverage, used as alpha for a flat text color
const TEXT_FRAGMENT_SHADER: &str = r#"#version 330 core
in vec2 TexCoords;

uniform sampler2D text;
uniform vec3 textColor;

out vec4 color;

void main() {
    vec4 sampled = vec4(1.0, 1.0, 1.0, texture(text, TexCoords).r);
    color = vec4(textColor, 1.0) * sampled;
}
"#;

/// Compiled glyph quad shader program
pub struct TextShader {
    program: glow::Program,
    pub u_projection: glow::UniformLocation,
    pub u_text: glow::UniformLocation,
    pub u_text_color: glow::UniformLocation,
}

impl TextShader {
    /// Compile and link the glyph quad shader
    pub fn new(gl: &glow::Context) -> Result<Self> {
        let program = compile_program(gl, TEXT_VERTEX_SHADER, TEXT_FRAGMENT_SHADER)?;

        let (u_projection, u_text, u_text_color) = match locate_uniforms(gl, program) {
            Ok(u) => u,
            Err(e) => {
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        info!("Text shader compiled");
        Ok(Self {
            program,
            u_projection,
            u_text,
            u_text_color,
        })
    }

    /// Activate the shader
    pub fn bind(&self, gl: &glow::Context) {
        unsafe {
            gl.use_program(Some(self.program));
        }
    }

    /// Set orthographic projection matrix
    pub fn set_projection(&self, gl: &glow::Context, matrix: &[f32; 16]) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(&self.u_projection), false, matrix);
        }
    }

    /// Set glyph texture unit
    pub fn set_texture_unit(&self, gl: &glow::Context, unit: i32) {
        unsafe {
            gl.uniform_1_i32(Some(&self.u_text), unit);
        }
    }

    /// Set text color (applied uniformly to every glyph)
    pub fn set_text_color(&self, gl: &glow::Context, color: [f32; 3]) {
        unsafe {
            gl.uniform_3_f32(Some(&self.u_text_color), color[0], color[1], color[2]);
        }
    }

    /// Release resources
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.program);
        }
    }
}

fn locate_uniforms(
    gl: &glow::Context,
    program: glow::Program,
) -> Result<(glow::UniformLocation, glow::UniformLocation, glow::UniformLocation)> {
    let find = |name: &str| unsafe {
        gl.get_uniform_location(program, name)
            .ok_or_else(|| anyhow!("{} uniform not found", name))
    };
    Ok((find("projection")?, find("text")?, find("textColor")?))
}

/// Generate orthographic projection matrix (bottom-left origin)
///
/// Map pixel coordinates (0,0)-(width,height)
/// to NDC (-1,-1)-(1,1), y up
pub fn ortho_projection(width: f32, height: f32) -> [f32; 16] {
    let l = 0.0_f32;
    let r = width;
    let b = 0.0_f32; // bottom
    let t = height; // top
    let n = -1.0_f32;
    let f = 1.0_f32;

    // Column-major (OpenGL convention)
    [
        2.0 / (r - l),
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / (t - b),
        0.0,
        0.0,
        0.0,
        0.0,
        -2.0 / (f - n),
        0.0,
        -(r + l) / (r - l),
        -(t + b) / (t - b),
        -(f + n) / (f - n),
        1.0,
    ]
}

/// Compile shader and link program
fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program> {
    unsafe {
        let vs = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
        let fs = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(vs);
                return Err(e);
            }
        };

        let program = gl
            .create_program()
            .map_err(|e| anyhow!("Failed to create program: {}", e))?;

        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(anyhow!("Shader link failed: {}", log));
        }

        // Shader objects no longer needed after linking
        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        Ok(program)
    }
}

/// Compile individual shader
fn compile_shader(gl: &glow::Context, shader_type: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl
            .create_shader(shader_type)
            .map_err(|e| anyhow!("Failed to create shader: {}", e))?;

        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            let type_name = match shader_type {
                glow::VERTEX_SHADER => "vertex",
                glow::FRAGMENT_SHADER => "fragment",
                _ => "unknown",
            };
            return Err(anyhow!("{} shader compile failed: {}", type_name, log));
        }

        Ok(shader)
    }
}
