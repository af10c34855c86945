//! Configuration loading and discovery for `aura.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::AuraConfig;
use crate::models::DisasterMode;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up during discovery.
pub const CONFIG_FILE: &str = "aura.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse aura.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub mode: Option<DisasterMode>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
    pub frames: Option<u32>,
    pub frame_ms: Option<u32>,
    pub scale: Option<u8>,
    pub background: Option<String>,
}

/// Find aura.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for aura.toml
/// 2. Check XDG_CONFIG_HOME/aura-haven/aura.toml (or ~/.config/aura-haven/aura.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find aura.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("aura-haven").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find aura.toml by walking up from `start`.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an aura.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one, falling back to [`default_config`].
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("site/aura.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<AuraConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE);
            Ok(default_config())
        }
    }
}

fn load_config_file(path: &Path) -> Result<AuraConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AuraConfig = toml::from_str(&contents)?;
    check(config)
}

/// Run validation, turning any problems into [`ConfigError::Validation`].
pub fn check(config: AuraConfig) -> Result<AuraConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Configuration used when no aura.toml is found.
pub fn default_config() -> AuraConfig {
    AuraConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The result is
/// not re-validated; use [`check`] afterwards.
pub fn merge_cli_overrides(config: &mut AuraConfig, overrides: &CliOverrides) {
    if let Some(mode) = overrides.mode {
        config.backdrop.mode = mode;
    }
    if let Some(width) = overrides.width {
        config.backdrop.width = width;
    }
    if let Some(height) = overrides.height {
        config.backdrop.height = height;
    }
    if let Some(seed) = overrides.seed {
        config.backdrop.seed = Some(seed);
    }
    if let Some(frames) = overrides.frames {
        config.output.frames = frames;
    }
    if let Some(frame_ms) = overrides.frame_ms {
        config.output.frame_ms = frame_ms;
    }
    if let Some(scale) = overrides.scale {
        config.output.scale = scale;
    }
    if let Some(ref background) = overrides.background {
        config.output.background = Some(background.clone());
    }
}
