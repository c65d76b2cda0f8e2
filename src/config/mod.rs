//! Configuration file support for capgrab.
//!
//! This module handles loading user settings from the configuration file
//! located at `~/.config/capgrab/config.toml`: capture directories and
//! recording defaults. If no config file exists, sensible defaults are
//! used automatically. Command-line flags override config values.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [directories]
/// videos = "/home/me/Videos/Screenshot"
/// pictures = "/home/me/Pictures/Screenshot"
///
/// [recording]
/// framerate = 30
/// quality = 16
/// screen = "0"
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where captures are written when no explicit path is given
    #[serde(default)]
    pub directories: DirectoriesConfig,

    /// Recording defaults (framerate, quality, screen index)
    #[serde(default)]
    pub recording: RecordingConfig,
}

/// Capture output directories.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DirectoriesConfig {
    /// Directory for recordings.
    pub videos: PathBuf,
    /// Directory for still captures.
    pub pictures: PathBuf,
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            videos: dirs::video_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Screenshot"),
            pictures: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Screenshot"),
        }
    }
}

/// Recording defaults, each overridable from the command line.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Capture framerate in frames per second.
    pub framerate: u32,
    /// Constant-quality value for the video encoder (lower is better).
    pub quality: u32,
    /// Screen index to capture.
    pub screen: String,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            framerate: 30,
            quality: 16,
            screen: "0".to_string(),
        }
    }
}

impl Config {
    /// Clamps configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `framerate`: 1 - 240
    /// - `quality`: 0 - 51 (the encoder's constant-quality scale)
    fn validate_and_clamp(&mut self) {
        if !(1..=240).contains(&self.recording.framerate) {
            log::warn!(
                "Invalid framerate {}, clamping to 1-240 range",
                self.recording.framerate
            );
            self.recording.framerate = self.recording.framerate.clamp(1, 240);
        }

        if self.recording.quality > 51 {
            log::warn!(
                "Invalid quality {}, clamping to 0-51 range",
                self.recording.quality
            );
            self.recording.quality = 51;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined
    /// (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("capgrab");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(&config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }
}
