//! Configuration schema types for `aura.toml`
//!
//! Defines the structure and validation rules for backdrop rendering
//! configuration.

use serde::{Deserialize, Serialize};

use crate::color::{parse_color, Color, ColorError, NeonPalette};
use crate::models::DisasterMode;
use crate::output::{check_output_size, MAX_OUTPUT_PIXELS};

/// Largest accepted output scale factor.
pub const MAX_SCALE: u8 = 16;

/// Largest accepted viewport side, in pixels.
pub const MAX_VIEWPORT: u32 = 8192;

/// Viewport and mode of the backdrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackdropConfig {
    /// Disaster mode to render
    #[serde(default)]
    pub mode: DisasterMode,
    /// Viewport width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Viewport height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
    /// RNG seed; a fresh one is drawn per run when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            mode: DisasterMode::default(),
            width: default_width(),
            height: default_height(),
            seed: None,
        }
    }
}

/// Exported frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of frames to simulate
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Frame interval in milliseconds
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u32,
    /// Loop exported GIFs forever
    #[serde(default = "default_true", rename = "loop")]
    pub loop_anim: bool,
    /// Integer upscale factor
    #[serde(default = "default_scale")]
    pub scale: u8,
    /// Background color painted under the particles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

fn default_frames() -> u32 {
    120
}

fn default_frame_ms() -> u32 {
    16
}

fn default_true() -> bool {
    true
}

fn default_scale() -> u8 {
    1
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            frame_ms: default_frame_ms(),
            loop_anim: true,
            scale: default_scale(),
            background: None,
        }
    }
}

/// Overrides for the neon paint colors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cyan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orange: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pink: Option<String>,
}

impl PaletteConfig {
    /// Resolve overrides on top of the default palette.
    pub fn resolve(&self) -> Result<NeonPalette, ColorError> {
        let mut palette = NeonPalette::default();
        if let Some(c) = &self.cyan {
            palette.cyan = parse_color(c)?;
        }
        if let Some(c) = &self.orange {
            palette.orange = parse_color(c)?;
        }
        if let Some(c) = &self.pink {
            palette.pink = parse_color(c)?;
        }
        Ok(palette)
    }

    fn entries(&self) -> [(&'static str, Option<&String>); 3] {
        [("cyan", self.cyan.as_ref()), ("orange", self.orange.as_ref()), ("pink", self.pink.as_ref())]
    }
}

/// Complete aura.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuraConfig {
    #[serde(default)]
    pub backdrop: BackdropConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "output.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "aura.toml: '{}' {}", self.field, self.message)
    }
}

impl AuraConfig {
    /// Validate the configuration and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        let (width, height) = (self.backdrop.width, self.backdrop.height);
        for (field, side) in [("backdrop.width", width), ("backdrop.height", height)] {
            if !(1..=MAX_VIEWPORT).contains(&side) {
                push(field, format!("must be between 1 and {}", MAX_VIEWPORT));
            }
        }
        if self.output.frames == 0 {
            push("output.frames", "must be a positive integer".to_string());
        }
        if self.output.frame_ms == 0 {
            push("output.frame_ms", "must be a positive integer".to_string());
        }
        if !(1..=MAX_SCALE).contains(&self.output.scale) {
            push("output.scale", format!("must be between 1 and {}", MAX_SCALE));
        }
        let scale = u64::from(self.output.scale);
        if check_output_size(u64::from(width) * scale, u64::from(height) * scale).is_err() {
            push(
                "output.scale",
                format!(
                    "makes a {}x{} viewport larger than {} pixels",
                    width, height, MAX_OUTPUT_PIXELS
                ),
            );
        }
        if let Some(bg) = &self.output.background {
            if let Err(e) = parse_color(bg) {
                push("output.background", format!("is not a color: {}", e));
            }
        }
        for (name, value) in self.palette.entries() {
            if let Some(Err(e)) = value.map(|v| parse_color(v)) {
                push(&format!("palette.{}", name), format!("is not a color: {}", e));
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Background color, transparent when unset or unparseable.
    pub fn background(&self) -> Color {
        self.output
            .background
            .as_deref()
            .and_then(|s| parse_color(s).ok())
            .unwrap_or(Color::TRANSPARENT)
    }

    /// Paint palette with config overrides applied; invalid entries fall
    /// back to the defaults.
    pub fn neon_palette(&self) -> NeonPalette {
        self.palette.resolve().unwrap_or_default()
    }
}
