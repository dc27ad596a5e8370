//! Window event loop
//!
//! Creates the GL window on resume, clears every frame and optionally
//! draws the configured text with the glyph quad renderer.

use anyhow::Result;
use glow::HasContext;
use log::{error, info, trace};
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use crate::config::{Config, RenderConfig};
use crate::font::{GlyphBitmap, GlyphTable};
use crate::gpu::shader::ortho_projection;
use crate::gpu::{GlWindow, GlyphQuadRenderer, TextShader};

/// GL objects that live as long as the window
struct GpuState {
    shader: TextShader,
    renderer: GlyphQuadRenderer,
    glyphs: GlyphTable<glow::Texture>,
    clear_color: [f32; 4],
    // Dropped last: owns the context the objects above belong to
    window: GlWindow,
}

impl GpuState {
    fn new(
        event_loop: &ActiveEventLoop,
        config: &Config,
        staged: &GlyphTable<GlyphBitmap>,
    ) -> Result<Self> {
        let window = GlWindow::new(event_loop, &config.window)?;
        let gl = window.gl();

        unsafe {
            gl.enable(glow::CULL_FACE);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            // Glyph bitmaps are tightly packed single bytes
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        }

        let shader = TextShader::new(gl)?;
        shader.bind(gl);
        // Fixed to the configured size, resizing only moves the viewport
        let projection =
            ortho_projection(config.window.width as f32, config.window.height as f32);
        shader.set_projection(gl, &projection);

        let renderer = match GlyphQuadRenderer::new(gl) {
            Ok(r) => r,
            Err(e) => {
                shader.destroy(gl);
                return Err(e);
            }
        };

        let glyphs = match staged.upload(gl) {
            Ok(g) => g,
            Err(e) => {
                renderer.destroy(gl);
                shader.destroy(gl);
                return Err(e);
            }
        };

        Ok(Self {
            shader,
            renderer,
            glyphs,
            clear_color: config.window.background_rgba(),
            window,
        })
    }

    fn draw(&self, render: &RenderConfig) -> Result<()> {
        let gl = self.window.gl();
        let [r, g, b, a] = self.clear_color;

        unsafe {
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        if render.enabled {
            self.renderer.render_text(
                gl,
                &self.shader,
                &self.glyphs,
                &render.text,
                render.x,
                render.y,
                render.scale,
                render.color_rgb(),
            )?;
        }

        self.window.swap_buffers()
    }

    /// Release GL objects while the context is still current
    fn destroy(&self) {
        let gl = self.window.gl();
        self.glyphs.destroy(gl);
        self.renderer.destroy(gl);
        self.shader.destroy(gl);
    }
}

pub struct App {
    config: Config,
    /// CPU-side glyph table, uploaded once the context exists
    staged: GlyphTable<GlyphBitmap>,
    gpu: Option<GpuState>,
    /// First fatal error, reported after the loop exits
    error: Option<anyhow::Error>,
    last_frame: Instant,
    frames: u64,
}

impl App {
    pub fn new(config: Config, staged: GlyphTable<GlyphBitmap>) -> Self {
        Self {
            config,
            staged,
            gpu: None,
            error: None,
            last_frame: Instant::now(),
            frames: 0,
        }
    }

    /// Outcome of the event loop
    pub fn into_result(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!("{:#}", e);
        if self.error.is_none() {
            self.error = Some(e);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match GpuState::new(event_loop, &self.config, &self.staged) {
            Ok(gpu) => {
                gpu.window.window().request_redraw();
                self.gpu = Some(gpu);
                self.last_frame = Instant::now();
                info!("Render loop started");
            }
            Err(e) => self.fail(event_loop, e.context("Failed to initialize OpenGL window")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(gpu) = &self.gpu else { return };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                info!("Escape pressed, closing");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.window.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame);
                self.last_frame = now;
                self.frames += 1;
                trace!("frame {} dt={:.2}ms", self.frames, delta.as_secs_f64() * 1000.0);

                if let Err(e) = gpu.draw(&self.config.render) {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
        info!("Render loop finished after {} frames", self.frames);
    }
}
