//! glyphbake - text bitmap baker and glyph quad renderer
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Font file (fontdue)                     │
//! │      ↓                    ↓              │
//! │  Text bitmap         Glyph table         │
//! │      ↓                    ↓              │
//! │  PNG export       Window + quad renderer │
//! └──────────────────────────────────────────┘
//! ```

mod app;
mod config;
mod constants;
mod error;
mod export;
mod font;
mod gpu;
mod utils;

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::error::TextError;
use crate::font::{FontdueFace, GlyphTable};

/// Print help message
fn print_help() {
    println!(
        r#"glyphbake {} - bake a line of text into a PNG and draw glyph quads

USAGE:
    glyphbake [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --headless              Write the PNG and exit without opening a window
    --init-config           Generate a commented default config file
    -f, --force             Overwrite an existing config file

ENVIRONMENT:
    GLYPHBAKE_CONFIG        Config file to load (and --init-config target)
    RUST_LOG                Log filter (default: warn)

CONFIG FILE:
    ~/.config/glyphbake/config.toml
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Warn about characters the font has no outline for
fn warn_missing_glyphs(font: &FontdueFace, text: &str, what: &str) {
    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        if !font.has_glyph(ch) {
            warn!("{}: font has no glyph for {:?}, using .notdef", what, ch);
        }
    }
}

/// Build the text bitmap and write it out
fn bake_png(font: &FontdueFace, cfg: &config::Config) -> Result<()> {
    warn_missing_glyphs(font, &cfg.font.text, "bitmap text");

    let bitmap = font::build_atlas(
        font,
        &cfg.font.text,
        cfg.font.pixel_height,
        cfg.font.overflow,
    )?;

    match export::write_png(Path::new(&cfg.output.png_path), &bitmap) {
        Ok(()) => Ok(()),
        Err(TextError::EmptyBitmap { width, height }) => {
            warn!(
                "Text bitmap is empty ({}x{}), PNG not written",
                width, height
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("glyphbake {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config file generation mode
    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        match config::Config::write_default(force) {
            Ok(path) => {
                println!("Config file generated: {}", path.display());
                return Ok(());
            }
            Err(e) => {
                eprintln!("Failed to generate config: {:#}", e);
                return Err(e);
            }
        }
    }

    let headless = args.iter().any(|a| a == "--headless");

    info!("glyphbake starting...");

    let cfg = config::Config::load();

    let font = FontdueFace::load(Path::new(&cfg.font.path))?;

    bake_png(&font, &cfg)?;

    if headless {
        info!("Headless mode: skipping window");
        return Ok(());
    }

    warn_missing_glyphs(&font, &cfg.render.text, "render text");
    let glyphs = GlyphTable::build_with_ascii(&font, &cfg.render.text, cfg.render.pixel_size);
    info!("Glyph table built at {}px", glyphs.pixel_size());
    // Rasterization is done; the font is not needed by the render loop
    drop(font);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(cfg, glyphs);
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated abnormally")?;

    app.into_result()
}
