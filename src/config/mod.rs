//! Configuration for hornet
//!
//! Settings come from a TOML file, then environment variables, then
//! command-line flags (applied by the binary).
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./hornet.toml` - Project-local configuration
//! 2. `~/.config/hornet/config.toml` - User configuration (XDG)
//! 3. `~/.hornet/config.toml` - User configuration (legacy)
//! 4. `/etc/hornet/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `HORNET_FORMAT` - Output format (text, json)
//! - `HORNET_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `HORNET_MAX_DEPTH` - Maximum goal depth (0 = unlimited)
//! - `HORNET_CONJUNCTION` - Body conjunction mode (threaded, single-pass)
//! - `HORNET_TRACE` - Print derivation traces (true/false)
//! - `HORNET_INGEST_POLICY` - Knowledge ingest policy (all-or-nothing, prefix)
//!
//! # Example Configuration
//!
//! ```toml
//! # hornet.toml
//!
//! [general]
//! format = "text"
//! log_level = "normal"
//!
//! [resolution]
//! max_depth = 64
//! conjunction = "threaded"
//! trace = true
//!
//! [ingest]
//! policy = "all-or-nothing"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::IngestPolicy;
use crate::reasoning::ConjunctionMode;

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HornetConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Resolution settings
    pub resolution: ResolutionConfig,
    /// Knowledge ingest settings
    pub ingest: IngestConfig,
}

/// General configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Output format for query results
    pub format: OutputFormat,
    /// Logging level
    pub log_level: LogLevel,
}

/// Resolution configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Maximum goal depth (0 = unlimited)
    pub max_depth: usize,
    /// How rule bodies are solved
    pub conjunction: ConjunctionMode,
    /// Print derivation traces after results
    pub trace: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    /// What happens to earlier statements when a later one fails to parse
    pub policy: IngestPolicy,
}

// ============================================================================
// Enums
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// The `tracing` filter directive for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "warn",
            LogLevel::Verbose => "info",
            LogLevel::Debug => "debug",
        }
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl HornetConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from default locations
    ///
    /// The first existing file in [`config_paths`](Self::config_paths) is
    /// read, then environment variable overrides are applied.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = Self::config_paths().into_iter().find(|p| p.exists()) {
            config = Self::load_from_file(&path)?;
        }

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        let config: HornetConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./hornet.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("hornet").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".hornet").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/hornet/config.toml"));

        paths
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable
    /// name. Unrecognised values are rejected.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HORNET_FORMAT") {
            self.general.format = OutputFormat::from_str(&val)
                .ok_or_else(|| ConfigError::invalid("HORNET_FORMAT", &val))?;
        }

        if let Some(val) = lookup("HORNET_LOG_LEVEL") {
            self.general.log_level = LogLevel::from_str(&val)
                .ok_or_else(|| ConfigError::invalid("HORNET_LOG_LEVEL", &val))?;
        }

        if let Some(val) = lookup("HORNET_MAX_DEPTH") {
            self.resolution.max_depth = val
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::invalid("HORNET_MAX_DEPTH", &val))?;
        }

        if let Some(val) = lookup("HORNET_CONJUNCTION") {
            self.resolution.conjunction = ConjunctionMode::from_str(&val)
                .ok_or_else(|| ConfigError::invalid("HORNET_CONJUNCTION", &val))?;
        }

        if let Some(val) = lookup("HORNET_TRACE") {
            self.resolution.trace = parse_flag(&val)
                .ok_or_else(|| ConfigError::invalid("HORNET_TRACE", &val))?;
        }

        if let Some(val) = lookup("HORNET_INGEST_POLICY") {
            self.ingest.policy = IngestPolicy::from_str(&val)
                .ok_or_else(|| ConfigError::invalid("HORNET_INGEST_POLICY", &val))?;
        }

        Ok(())
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Write configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# hornet configuration file

[general]
# Output format: text, json
format = "text"
# Logging level: quiet, normal, verbose, debug
log_level = "normal"

[resolution]
# Maximum goal depth (0 = unlimited)
max_depth = 0
# How rule bodies are solved: threaded, single-pass
conjunction = "threaded"
# Print derivation traces after results
trace = false

[ingest]
# On a malformed statement: all-or-nothing, prefix
policy = "all-or-nothing"
"#
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error reading/writing config file
    Io(PathBuf, String),
    /// Parse error in config file
    Parse(PathBuf, String),
    /// Serialization error
    Serialize(String),
    /// A setting with a value that is not recognised
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, msg) => {
                write!(f, "IO error reading {}: {}", path.display(), msg)
            }
            ConfigError::Parse(path, msg) => {
                write!(f, "Parse error in {}: {}", path.display(), msg)
            }
            ConfigError::Serialize(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================
