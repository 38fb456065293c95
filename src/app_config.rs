use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use crate::encoder::EcLevel;
use crate::errors::GeneratorError;
use crate::file_utils::FileManager;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What a second `generate` call does while a run is in flight
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusyPolicy {
    // @policy: Wait for the running batch to finish
    #[default]
    Block,
    // @policy: Fail immediately with a Busy error
    Reject,
}

impl std::fmt::Display for BusyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Batch generation settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationConfig {
    /// QR error-correction level
    #[serde(default)]
    pub error_correction: EcLevel,

    /// Width and height of each image in pixels
    #[serde(default = "default_pixel_size")]
    pub pixel_size: u32,

    /// Number of workers; 0 uses one per available processing unit.
    /// Higher values trade filesystem contention for lower latency on encoding.
    #[serde(default)]
    pub worker_count: usize,

    /// Behavior when a run is already in flight
    #[serde(default)]
    pub busy_policy: BusyPolicy,

    /// Fail the run when the output folder cannot be created.
    /// When false, a warning is logged and every record is attempted anyway.
    #[serde(default = "default_true")]
    pub strict_output_folder: bool,

    /// Write qrbatch.issues.log into the output folder when a run has issues
    #[serde(default = "default_true")]
    pub write_issues_log: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            error_correction: EcLevel::default(),
            pixel_size: default_pixel_size(),
            worker_count: 0,
            busy_policy: BusyPolicy::default(),
            strict_output_folder: true,
            write_issues_log: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Smallest image that fits a version 1 symbol at one pixel per module
pub const MIN_PIXEL_SIZE: u32 = 21;
pub const MAX_PIXEL_SIZE: u32 = 4096;
pub const MAX_WORKERS: usize = 1024;

fn default_pixel_size() -> u32 {
    256
}

fn default_true() -> bool {
    true
}

impl GenerationConfig {
    /// Check the settings a generator cannot run with
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(MIN_PIXEL_SIZE..=MAX_PIXEL_SIZE).contains(&self.pixel_size) {
            return Err(GeneratorError::InvalidConfig {
                reason: format!(
                    "Pixel size must be between {} and {}, got {}",
                    MIN_PIXEL_SIZE, MAX_PIXEL_SIZE, self.pixel_size
                ),
            });
        }

        if self.worker_count > MAX_WORKERS {
            return Err(GeneratorError::InvalidConfig {
                reason: format!(
                    "Worker count must be at most {}, got {}",
                    MAX_WORKERS, self.worker_count
                ),
            });
        }

        Ok(())
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.generation.validate()?;
        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the file at `path`, or create it with defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }
}
