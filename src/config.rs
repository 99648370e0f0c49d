//! Configuration management for the `GeoAssist` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AssistantError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `GeoAssist` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Answer circle settings
    #[serde(default)]
    pub circle: CircleConfig,
    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Answer circle map settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleConfig {
    /// Radius used when none is given, in kilometers
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Delay before the map page closes itself, in milliseconds (0 disables)
    #[serde(default = "default_auto_close_ms")]
    pub auto_close_ms: u64,
    /// Padding around the fitted bounds in pixels
    #[serde(default = "default_fit_padding_px")]
    pub fit_padding_px: u32,
    /// Zoom used when fitting the bounds fails
    #[serde(default = "default_fallback_zoom")]
    pub fallback_zoom: u8,
    /// Where the map document is written
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim instance
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,
    /// Base URL of the REST Countries API
    #[serde(default = "default_restcountries_base_url")]
    pub restcountries_base_url: String,
    /// User agent sent with every request (required by Nominatim usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Nominatim detail level (3 = country .. 18 = building)
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a notification stays visible, in milliseconds
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_radius_km() -> f64 {
    1500.0
}

fn default_auto_close_ms() -> u64 {
    30_000
}

fn default_fit_padding_px() -> u32 {
    80
}

fn default_fallback_zoom() -> u8 {
    4
}

fn default_output_path() -> String {
    std::env::temp_dir()
        .join("geoassist-answer-circle.html")
        .to_string_lossy()
        .into_owned()
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_restcountries_base_url() -> String {
    "https://restcountries.com/v3.1".to_string()
}

fn default_user_agent() -> String {
    format!("GeoAssist/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u32 {
    30
}

fn default_zoom() -> u8 {
    10
}

fn default_display_ms() -> u64 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            auto_close_ms: default_auto_close_ms(),
            fit_padding_px: default_fit_padding_px(),
            fallback_zoom: default_fallback_zoom(),
            output_path: default_output_path(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_base_url: default_nominatim_base_url(),
            restcountries_base_url: default_restcountries_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            zoom: default_zoom(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            circle: CircleConfig::default(),
            geocoding: GeocodingConfig::default(),
            notifications: NotificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AssistantConfig {
    /// Load configuration from `config_path`, or the default location when
    /// `None`, layered under `GEOASSIST_*` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GEOASSIST_CIRCLE__DEFAULT_RADIUS_KM=800 etc.
        builder = builder.add_source(
            Environment::with_prefix("GEOASSIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AssistantConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geoassist").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.circle.output_path.is_empty() {
            self.circle.output_path = default_output_path();
        }
        if self.geocoding.nominatim_base_url.is_empty() {
            self.geocoding.nominatim_base_url = default_nominatim_base_url();
        }
        if self.geocoding.restcountries_base_url.is_empty() {
            self.geocoding.restcountries_base_url = default_restcountries_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.notifications.display_ms == 0 {
            self.notifications.display_ms = default_display_ms();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let radius = self.circle.default_radius_km;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AssistantError::config(format!(
                "Default radius must be a positive number of kilometers, got {radius}"
            ))
            .into());
        }

        if self.geocoding.timeout_seconds > 300 {
            return Err(
                AssistantError::config("Geocoding timeout cannot exceed 300 seconds").into(),
            );
        }

        if !(3..=18).contains(&self.geocoding.zoom) {
            return Err(AssistantError::config("Geocoding zoom must be between 3 and 18").into());
        }

        if self.circle.fallback_zoom > 19 {
            return Err(AssistantError::config("Fallback zoom cannot exceed 19").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AssistantError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AssistantError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Nominatim", &self.geocoding.nominatim_base_url),
            ("REST Countries", &self.geocoding.restcountries_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AssistantError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AssistantConfig::default();
        assert_eq!(config.circle.default_radius_km, 1500.0);
        assert_eq!(config.circle.auto_close_ms, 30_000);
        assert_eq!(config.circle.fit_padding_px, 80);
        assert_eq!(
            config.geocoding.nominatim_base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.geocoding.zoom, 10);
        assert_eq!(config.notifications.display_ms, 4000);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AssistantConfig::default();
        config.logging.level = "loud".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_rejects_non_positive_radius() {
        let mut config = AssistantConfig::default();
        config.circle.default_radius_km = 0.0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Default radius"));
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AssistantConfig::default();
        config.geocoding.restcountries_base_url = "restcountries.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("REST Countries"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_fields() {
        let mut config = AssistantConfig::default();
        config.geocoding.user_agent.clear();
        config.notifications.display_ms = 0;
        config.apply_defaults();
        assert!(config.geocoding.user_agent.starts_with("GeoAssist/"));
        assert_eq!(config.notifications.display_ms, 4000);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[circle]\ndefault_radius_km = 250.0\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = AssistantConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.circle.default_radius_km, 250.0);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.geocoding.zoom, 10);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AssistantConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("geoassist"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
