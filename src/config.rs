//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `COLDCLOUD_*` environment overrides.

use crate::calc::energy::MAX_HOURS_PER_DAY;
use crate::calc::CalculatorSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const LOG_FORMATS: [&str; 2] = ["pretty", "json"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub calculator: CalculatorConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key-value store location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("coldcloud").to_string_lossy().to_string())
        .unwrap_or_else(|| "./coldcloud_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Calculator defaults
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default = "default_history_view_limit")]
    pub history_view_limit: usize,

    #[serde(default = "default_duct_velocity")]
    pub default_duct_velocity: f64,

    #[serde(default = "default_duct_aspect_ratio")]
    pub duct_aspect_ratio: f64,

    #[serde(default = "default_energy_hours")]
    pub energy_hours_per_day: f64,
}

fn default_history_view_limit() -> usize {
    CalculatorSettings::default().history_view_limit
}

fn default_duct_velocity() -> f64 {
    CalculatorSettings::default().default_duct_velocity
}

fn default_duct_aspect_ratio() -> f64 {
    CalculatorSettings::default().duct_aspect_ratio
}

fn default_energy_hours() -> f64 {
    CalculatorSettings::default().energy_hours_per_day
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_view_limit: default_history_view_limit(),
            default_duct_velocity: default_duct_velocity(),
            duct_aspect_ratio: default_duct_aspect_ratio(),
            energy_hours_per_day: default_energy_hours(),
        }
    }
}

impl CalculatorConfig {
    pub fn to_settings(&self) -> CalculatorSettings {
        CalculatorSettings {
            history_view_limit: self.history_view_limit,
            default_duct_velocity: self.default_duct_velocity,
            duct_aspect_ratio: self.duct_aspect_ratio,
            energy_hours_per_day: self.energy_hours_per_day,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    ///
    /// Out-of-range overrides are ignored, so the result is always valid.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("coldcloud").join("config.toml")),
            Some(PathBuf::from("./coldcloud.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(data_dir) = var("COLDCLOUD_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Unparseable or out-of-range values keep the current setting
        if let Some(limit) = var("COLDCLOUD_HISTORY_LIMIT").and_then(|v| v.parse().ok()) {
            self.calculator.history_view_limit = limit;
        }
        let calc = &mut self.calculator;
        if let Some(velocity) = positive_var(&var, "COLDCLOUD_DUCT_VELOCITY", f64::INFINITY) {
            calc.default_duct_velocity = velocity;
        }
        if let Some(ratio) = positive_var(&var, "COLDCLOUD_DUCT_ASPECT_RATIO", f64::INFINITY) {
            calc.duct_aspect_ratio = ratio;
        }
        if let Some(hours) = positive_var(&var, "COLDCLOUD_ENERGY_HOURS", MAX_HOURS_PER_DAY) {
            calc.energy_hours_per_day = hours;
        }

        if let Some(level) = var("COLDCLOUD_LOG_LEVEL") {
            self.logging.level = level;
        }
        match var("COLDCLOUD_LOG_FORMAT") {
            Some(format) if LOG_FORMATS.contains(&format.as_str()) => self.logging.format = format,
            Some(format) => tracing::warn!("Ignoring COLDCLOUD_LOG_FORMAT={}", format),
            None => {}
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let calc = &self.calculator;
        let checks = [
            ("calculator.default_duct_velocity", calc.default_duct_velocity),
            ("calculator.duct_aspect_ratio", calc.duct_aspect_ratio),
            ("calculator.energy_hours_per_day", calc.energy_hours_per_day),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
        if calc.energy_hours_per_day > MAX_HOURS_PER_DAY {
            return Err(ConfigError::Invalid {
                field: "calculator.energy_hours_per_day",
                reason: format!("cannot exceed {}", MAX_HOURS_PER_DAY),
            });
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Invalid {
                field: "logging.format",
                reason: format!("expected pretty or json, got '{}'", self.logging.format),
            });
        }
        Ok(())
    }

    /// Data directory with a leading `~` expanded
    pub fn data_dir(&self) -> PathBuf {
        match self.storage.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.storage.data_dir)),
            None => PathBuf::from(&self.storage.data_dir),
        }
    }
}

/// Parse a numeric override in `(0, max]`
fn positive_var(var: impl Fn(&str) -> Option<String>, name: &str, max: f64) -> Option<f64> {
    let raw = var(name)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 && value <= max => Some(value),
        _ => {
            tracing::warn!("Ignoring {}={}", name, raw);
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ColdCloud Configuration
#
# Environment variables override these settings:
# - COLDCLOUD_DATA_DIR
# - COLDCLOUD_HISTORY_LIMIT
# - COLDCLOUD_DUCT_VELOCITY
# - COLDCLOUD_DUCT_ASPECT_RATIO
# - COLDCLOUD_ENERGY_HOURS
# - COLDCLOUD_LOG_LEVEL
# - COLDCLOUD_LOG_FORMAT

[storage]
# Directory holding one JSON file per stored collection
data_dir = "~/.local/share/coldcloud"

[calculator]
# Records shown per calculator in history views
history_view_limit = 5

# Duct air velocity used when none is given (FPM)
default_duct_velocity = 900.0

# Width/height ratio for rectangular ducts
duct_aspect_ratio = 1.5

# Daily run time assumed by the energy cost calculator
energy_hours_per_day = 8.0

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_template_parses() {
        let file = write_config(&generate_default_config());
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.calculator.to_settings(), CalculatorSettings::default());
        assert_eq!(config.logging.format, "pretty");
        assert!(config.data_dir().ends_with(".local/share/coldcloud"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = write_config("[calculator]\nhistory_view_limit = 10\n");
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.calculator.history_view_limit, 10);
        assert_eq!(config.calculator.default_duct_velocity, 900.0);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("[calculator]\nduct_aspect_ratio = 0.0\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { field: "calculator.duct_aspect_ratio", .. })
        ));

        let file = write_config("[logging]\nformat = \"xml\"\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { field: "logging.format", .. })
        ));

        let file = write_config("[calculator\n");
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("/nonexistent/coldcloud.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("COLDCLOUD_DATA_DIR", "/tmp/coldcloud"),
            ("COLDCLOUD_HISTORY_LIMIT", "12"),
            ("COLDCLOUD_DUCT_VELOCITY", "not-a-number"),
            ("COLDCLOUD_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.data_dir(), PathBuf::from("/tmp/coldcloud"));
        assert_eq!(config.calculator.history_view_limit, 12);
        assert_eq!(config.calculator.default_duct_velocity, 900.0);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_out_of_range_overrides_ignored() {
        let vars: HashMap<&str, &str> = [
            ("COLDCLOUD_DUCT_VELOCITY", "-5"),
            ("COLDCLOUD_DUCT_ASPECT_RATIO", "0"),
            ("COLDCLOUD_ENERGY_HOURS", "30"),
            ("COLDCLOUD_LOG_FORMAT", "xml"),
        ]
        .into_iter()
        .collect();

        let file = write_config("[calculator]\ndefault_duct_velocity = 700.0\n");
        let mut config = Config::load(file.path()).unwrap();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.calculator.default_duct_velocity, 700.0);
        assert_eq!(config.calculator.duct_aspect_ratio, 1.5);
        assert_eq!(config.calculator.energy_hours_per_day, 8.0);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_in_range_overrides_applied() {
        let vars: HashMap<&str, &str> = [
            ("COLDCLOUD_DUCT_VELOCITY", "1100"),
            ("COLDCLOUD_ENERGY_HOURS", "24"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        let settings = config.calculator.to_settings();
        assert_eq!(settings.default_duct_velocity, 1100.0);
        assert_eq!(settings.energy_hours_per_day, 24.0);
        assert!(config.validate().is_ok());
    }
}
