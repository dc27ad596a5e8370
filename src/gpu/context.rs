//! GPU context management
//!
//! winit window + glutin OpenGL 3.3 core context + glow function loading

use anyhow::{anyhow, Context, Result};
use glow::HasContext;
use glutin::config::{Config as GlConfigHandle, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use log::{debug, error, info, warn};
use raw_window_handle::HasWindowHandle;
use std::ffi::CString;
use std::num::NonZeroU32;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

use crate::config::WindowConfig;

/// Window with a current OpenGL context
pub struct GlWindow {
    // Field order is drop order: surface and context before the window
    gl: glow::Context,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

/// Prefer the config with the fewest samples (plain, non-multisampled framebuffer)
fn pick_config(configs: Box<dyn Iterator<Item = GlConfigHandle> + '_>) -> GlConfigHandle {
    configs
        .reduce(|best, c| {
            if c.num_samples() < best.num_samples() {
                c
            } else {
                best
            }
        })
        // DisplayBuilder only calls the picker with a non-empty set
        .unwrap_or_else(|| {
            error!("No OpenGL config offered by the display");
            panic!("no OpenGL config offered by the display")
        })
}

impl GlWindow {
    /// Create window, context and surface, make the context current and load GL
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self> {
        info!(
            "Creating ({}x{}) window with title: {}",
            config.width, config.height, config.title
        );

        let window_attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attrs))
            .build(event_loop, template, pick_config)
            .map_err(|e| anyhow!("Failed to create window: {}", e))?;

        let window = window.ok_or_else(|| anyhow!("Display builder returned no window"))?;
        let raw_handle = window
            .window_handle()
            .context("Failed to get window handle")?
            .as_raw();

        let display = gl_config.display();

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        let not_current = unsafe {
            display
                .create_context(&gl_config, &context_attrs)
                .context("Failed to create OpenGL 3.3 core context")?
        };

        let size = window.inner_size();
        let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            non_zero(size.width),
            non_zero(size.height),
        );

        let surface = unsafe {
            display
                .create_window_surface(&gl_config, &surface_attrs)
                .context("Failed to create window surface")?
        };

        let context = not_current
            .make_current(&surface)
            .context("Failed to make OpenGL context current")?;

        if let Err(e) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
            warn!("Failed to enable vsync (continuing): {}", e);
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| match CString::new(symbol) {
                Ok(name) => display.get_proc_address(&name),
                Err(_) => std::ptr::null(),
            })
        };

        let version = gl.version();
        info!(
            "OpenGL {}.{} ({})",
            version.major, version.minor, version.vendor_info
        );
        debug!("Surface size: {}x{}", size.width, size.height);

        Ok(Self {
            gl,
            surface,
            context,
            window,
        })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize surface and GL viewport (projection is left as is)
    pub fn resize(&self, width: u32, height: u32) {
        self.surface
            .resize(&self.context, non_zero(width), non_zero(height));
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
        debug!("Viewport resized: {}x{}", width, height);
    }

    /// Present the back buffer
    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("Failed to swap buffers")
    }
}
