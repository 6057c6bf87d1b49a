#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for xcfetch
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/xcfetch/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;
use xcfetch_errors::{ConfigError, Error};
use xcfetch_progress::{ProgressStyle, DEFAULT_EMPTY_GLYPH, DEFAULT_FULL_GLYPH, DEFAULT_WIDTH};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// Progress bar appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_full_glyph")]
    pub full_glyph: String,
    #[serde(default = "default_empty_glyph")]
    pub empty_glyph: String,
    pub title: Option<String>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_timeout")]
    pub timeout: u64, // seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Authentication configuration
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Raw `Cookie` header of a signed-in developer session
    pub session_cookie: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub download_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

// Default implementations

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            full_glyph: DEFAULT_FULL_GLYPH.to_string(),
            empty_glyph: DEFAULT_EMPTY_GLYPH.to_string(),
            title: None,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: 300, // 5 minutes between reads
            connect_timeout: 30,
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions for serde
fn default_width() -> usize {
    DEFAULT_WIDTH
}

fn default_full_glyph() -> String {
    DEFAULT_FULL_GLYPH.to_string()
}

fn default_empty_glyph() -> String {
    DEFAULT_EMPTY_GLYPH.to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("xcfetch/{}", env!("CARGO_PKG_VERSION"))
}

impl ProgressConfig {
    /// Bar style for the renderer
    #[must_use]
    pub fn style(&self) -> ProgressStyle {
        ProgressStyle {
            width: self.width,
            full_glyph: self.full_glyph.clone(),
            empty_glyph: self.empty_glyph.clone(),
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("xcfetch").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML,
    /// or sets a bar width of zero.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file and fails if it is missing.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // XCFETCH_PROGRESS_WIDTH
        if let Ok(width) = std::env::var("XCFETCH_PROGRESS_WIDTH") {
            self.progress.width = parse_width("XCFETCH_PROGRESS_WIDTH", &width)?;
        }

        // XCFETCH_FULL_GLYPH
        if let Ok(glyph) = std::env::var("XCFETCH_FULL_GLYPH") {
            self.progress.full_glyph = glyph;
        }

        // XCFETCH_EMPTY_GLYPH
        if let Ok(glyph) = std::env::var("XCFETCH_EMPTY_GLYPH") {
            self.progress.empty_glyph = glyph;
        }

        // XCFETCH_SESSION_COOKIE
        if let Ok(cookie) = std::env::var("XCFETCH_SESSION_COOKIE") {
            if !cookie.trim().is_empty() {
                self.auth.session_cookie = Some(cookie);
            }
        }

        // XCFETCH_DOWNLOAD_DIR
        if let Ok(dir) = std::env::var("XCFETCH_DOWNLOAD_DIR") {
            self.paths.download_dir = Some(PathBuf::from(dir));
        }

        // XCFETCH_TIMEOUT
        if let Ok(timeout) = std::env::var("XCFETCH_TIMEOUT") {
            self.network.timeout = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "XCFETCH_TIMEOUT".to_string(),
                value: timeout,
            })?;
        }

        Ok(())
    }

    /// Check invariants serde cannot express
    ///
    /// # Errors
    ///
    /// Returns an error if the progress bar width is zero.
    pub fn validate(&self) -> Result<(), Error> {
        if self.progress.width == 0 {
            return Err(ConfigError::InvalidValue {
                field: "progress.width".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Get the download directory (with default)
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.paths
            .download_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the log directory (with default)
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.paths.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("xcfetch")
                .join("logs")
        })
    }
}

/// Parse a bar width, rejecting zero
///
/// # Errors
///
/// Returns an error if `value` is not a positive integer.
pub fn parse_width(field: &str, value: &str) -> Result<usize, Error> {
    match value.trim().parse::<usize>() {
        Ok(width) if width > 0 => Ok(width),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()),
    }
}
