//! Configuration loading and config file resolution
//!
//! Bootstrap settings come from a TOML file. Missing files degrade to
//! compiled defaults with a warning; a file that exists but cannot be read or
//! parsed is an error.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `<config dir>/atp/config.toml`
//! 4. Compiled defaults (fallback)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::reconstruct::ReconstructOptions;
use crate::recognized::DEFAULT_LOW_CONFIDENCE_THRESHOLD;
use crate::{Error, Result};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "ATP_CONFIG";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub parser: ParserConfig,
    pub planner: PlannerConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Default: 5000 (the port the calculator UI talks to)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Timetable parsing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Non-subject tokens on top of the built-in stoplist
    pub extra_stopwords: Vec<String>,
    /// OCR confidence below which parses carry a warning
    pub low_confidence_threshold: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            extra_stopwords: Vec::new(),
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Attendance planning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Target used when a request does not name one
    pub default_target_percent: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_target_percent: 75.0,
        }
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    DefaultFile(PathBuf),
    CompiledDefaults,
}

impl TomlConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::Config(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        if !(0.0..=100.0).contains(&self.parser.low_confidence_threshold) {
            return Err(Error::Config(format!(
                "parser.low_confidence_threshold must be within [0, 100], got {}",
                self.parser.low_confidence_threshold
            )));
        }
        if !(0.0..=100.0).contains(&self.planner.default_target_percent) {
            return Err(Error::Config(format!(
                "planner.default_target_percent must be within [0, 100], got {}",
                self.planner.default_target_percent
            )));
        }
        Ok(())
    }

    /// Reconstructor options derived from the `[parser]` section
    pub fn reconstruct_options(&self) -> ReconstructOptions {
        ReconstructOptions::with_extra_stopwords(&self.parser.extra_stopwords)
    }
}

/// Resolve and load the configuration following the priority order above.
pub fn resolve_config(
    cli_arg: Option<&Path>,
    env_var_name: &str,
) -> Result<(TomlConfig, ConfigSource)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        let config = TomlConfig::load(path)?;
        return Ok((config, ConfigSource::CommandLine(path.to_path_buf())));
    }

    // Priority 2: Environment variable
    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            let path = PathBuf::from(value);
            let config = TomlConfig::load(&path)?;
            return Ok((config, ConfigSource::Environment(path)));
        }
    }

    // Priority 3: Per-user config file
    if let Some(path) = default_config_path() {
        if path.exists() {
            let config = TomlConfig::load(&path)?;
            info!("Loaded configuration from {}", path.display());
            return Ok((config, ConfigSource::DefaultFile(path)));
        }
    }

    // Priority 4: Compiled defaults
    warn!("No configuration file found, using compiled defaults");
    Ok((TomlConfig::default(), ConfigSource::CompiledDefaults))
}

/// Platform config file location (`~/.config/atp/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("atp").join("config.toml"))
}
