use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable consulted for the weather API key when the config
/// file does not carry one.
pub const WEATHER_API_KEY_ENV: &str = "MOODMEAL_WEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a problem that makes the config unusable
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record a problem that only degrades behaviour
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Recipe backend settings
    #[serde(default)]
    pub recipes: RecipesConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// How the final recipe list is ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Unbiased shuffle of the whole list.
    Randomized,
    /// Highest score first (missing score counts as 0), capped at `display_cap`.
    #[default]
    ScoreRanked,
}

/// Recipe backend and result-shaping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipesConfig {
    /// Base URL of the recipe backend
    pub base_url: String,

    /// Path of the recipe endpoint, joined onto `base_url`
    pub path: String,

    /// Number of results requested per fetch
    pub limit: u32,

    /// Fewer primary results than this triggers the fallback fetch
    pub min_acceptable: usize,

    /// Maximum number of recipes shown under score ranking
    pub display_cap: usize,

    pub ordering: OrderingPolicy,

    /// Vibe sent for the fallback fetch and when no vibe can be resolved
    pub fallback_vibe: String,

    /// Ask the backend to randomize its candidates
    pub randomize: bool,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for transient failures (0 disables retrying)
    pub max_retries: u32,

    pub retry_initial_delay_ms: u64,

    pub retry_max_delay_ms: u64,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5050".to_string(),
            path: "/get_best_recipe".to_string(),
            limit: 10,
            min_acceptable: 3,
            display_cap: 5,
            ordering: OrderingPolicy::ScoreRanked,
            fallback_vibe: "Any".to_string(),
            randomize: true,
            timeout_secs: 10,
            max_retries: 0,
            retry_initial_delay_ms: 100,
            retry_max_delay_ms: 5000,
        }
    }
}

impl RecipesConfig {
    /// Full endpoint URL (`base_url` + `path`) with exactly one slash between them.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Units requested from the weather service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnits {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl TemperatureUnits {
    /// Value of the `units` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }
}

/// Weather lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,

    pub base_url: String,

    pub units: TemperatureUnits,

    /// Fixed location used in place of device geolocation
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Minutes before the session weather snapshot is considered stale
    pub refresh_minutes: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var(WEATHER_API_KEY_ENV).ok(),
            base_url: "https://api.openweathermap.org".to_string(),
            units: TemperatureUnits::Metric,
            latitude: None,
            longitude: None,
            refresh_minutes: 30,
        }
    }
}

impl WeatherConfig {
    /// Configured coordinates, if both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    ///
    /// A missing file is `ConfigError::NotFound` and bad TOML is
    /// `ConfigError::ParseError`; both can be recovered with `downcast_ref`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()));
            }
        };

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        if config.weather.api_key.is_none() {
            config.weather.api_key = std::env::var(WEATHER_API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings are logged.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        validate_url(&self.recipes.base_url, "recipes.base_url", &mut result);
        validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.recipes.limit == 0 {
            result.add_error("recipes.limit", "Limit must be greater than 0");
        }

        if self.recipes.display_cap == 0 {
            result.add_error("recipes.display_cap", "Display cap must be greater than 0");
        }

        if self.recipes.min_acceptable == 0 {
            result.add_warning(
                "recipes.min_acceptable",
                "Fallback fetch disabled (threshold 0)",
            );
        } else if self.recipes.min_acceptable > self.recipes.limit as usize {
            result.add_warning(
                "recipes.min_acceptable",
                "Threshold exceeds the page limit; the fallback fetch will always run",
            );
        }

        if self.recipes.fallback_vibe.trim().is_empty() {
            result.add_error("recipes.fallback_vibe", "Fallback vibe must not be empty");
        }

        if self.recipes.timeout_secs == 0 {
            result.add_error("recipes.timeout_secs", "Timeout must be greater than 0");
        }

        if self.weather.api_key.as_deref().map_or(true, str::is_empty) {
            result.add_warning(
                "weather.api_key",
                "No weather API key - recipes will use the generic vibe",
            );
        }

        if self.weather.coordinates().is_none() {
            result.add_warning(
                "weather.latitude",
                "No location configured - recipes will use the generic vibe",
            );
        }

        if let Some(lat) = self.weather.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                result.add_error("weather.latitude", "Latitude must be within -90..90");
            }
        }

        if let Some(lon) = self.weather.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                result.add_error("weather.longitude", "Longitude must be within -180..180");
            }
        }

        result
    }

    /// Save configuration to the given file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("moodmeal");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
