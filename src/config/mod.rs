//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/glyphbake/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;
use crate::font::OverflowPolicy;
use crate::utils::color::{parse_hex_color_to_f32, parse_hex_color_to_rgba};

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text bitmap settings
    pub font: FontConfig,
    /// Output settings
    pub output: OutputConfig,
    /// Window settings
    pub window: WindowConfig,
    /// On-screen text settings
    pub render: RenderConfig,
}

/// Text bitmap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType/OpenType file (relative to the working directory)
    pub path: String,
    /// Bitmap height in pixels (ascent - descent)
    pub pixel_height: f32,
    /// Text baked into the PNG
    pub text: String,
    /// Glyphs leaving the bitmap: "clip" (default) or "reject"
    pub overflow: OverflowPolicy,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// PNG written after the bitmap is built
    pub png_path: String,
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Clear color (RRGGBB)
    pub background: String,
}

/// On-screen text settings (glyph quad renderer)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Draw `text` every frame
    pub enabled: bool,
    pub text: String,
    /// Pen start (pixels, origin bottom-left)
    pub x: f32,
    pub y: f32,
    /// Quad scale factor
    pub scale: f32,
    /// Em size glyphs are rasterized at
    pub pixel_size: f32,
    /// Text color (RRGGBB)
    pub color: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: constants::DEFAULT_FONT_PATH.to_string(),
            pixel_height: constants::DEFAULT_PIXEL_HEIGHT,
            text: constants::DEFAULT_BAKE_TEXT.to_string(),
            overflow: OverflowPolicy::Clip,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            png_path: constants::DEFAULT_PNG_PATH.to_string(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: constants::SCR_WIDTH,
            height: constants::SCR_HEIGHT,
            title: constants::WINDOW_TITLE.to_string(),
            background: "cc4d0d".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "This is sample text".to_string(),
            x: 25.0,
            y: 25.0,
            scale: 1.0,
            pixel_size: constants::DEFAULT_GLYPH_PIXEL_SIZE,
            color: "80cc33".to_string(),
        }
    }
}

impl WindowConfig {
    /// Clear color as RGBA (0.0-1.0)
    pub fn background_rgba(&self) -> [f32; 4] {
        parse_hex_color_to_rgba(&self.background)
    }
}

impl RenderConfig {
    /// Text color as RGB (0.0-1.0)
    pub fn color_rgb(&self) -> [f32; 3] {
        let (r, g, b) = parse_hex_color_to_f32(&self.color);
        [r, g, b]
    }
}

impl Config {
    /// Environment variable overriding the config path
    const ENV_CONFIG: &'static str = "GLYPHBAKE_CONFIG";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. GLYPHBAKE_CONFIG environment variable
        if let Ok(path) = std::env::var(Self::ENV_CONFIG) {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
            warn!("{} points to a missing file: {}", Self::ENV_CONFIG, p.display());
        }

        // 2. User config: ~/.config/glyphbake/config.toml
        if let Some(config_path) = Self::user_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        None
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("glyphbake").join("config.toml"))
    }

    /// Load configuration with priority:
    /// 1. GLYPHBAKE_CONFIG environment variable
    /// 2. ~/.config/glyphbake/config.toml
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write a commented default config
    ///
    /// Goes to GLYPHBAKE_CONFIG if set, else the user config path.
    /// Refuses to overwrite an existing file unless `force`.
    pub fn write_default(force: bool) -> Result<PathBuf> {
        let config_path = match std::env::var(Self::ENV_CONFIG) {
            Ok(p) => PathBuf::from(p),
            Err(_) => Self::user_config_path()
                .ok_or_else(|| anyhow::anyhow!("Config directory not found"))?,
        };

        if config_path.exists() && !force {
            anyhow::bail!(
                "Config file already exists: {} (use --force to overwrite)",
                config_path.display()
            );
        }

        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        std::fs::write(&config_path, Self::template()?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        Ok(config_path)
    }

    /// Default settings serialized as TOML with a header
    pub fn template() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())?;
        Ok(format!(
            "# glyphbake configuration\n\
             #\n\
             # font.overflow: \"clip\" writes the visible part of glyphs that leave\n\
             # the bitmap, \"reject\" stops with an error instead.\n\
             # Colors are RRGGBB hex. Set render.enabled = true to draw text on screen.\n\n{}",
            body
        ))
    }
}
