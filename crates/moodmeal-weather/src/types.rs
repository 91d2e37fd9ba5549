use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition groups as reported in OpenWeatherMap's `weather[].main`
/// See: https://openweathermap.org/weather-conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    /// Mist, fog, haze and the other atmosphere group codes
    Atmosphere,
    Other,
}

impl WeatherCondition {
    /// Map an OpenWeatherMap `main` string to a condition
    pub fn from_owm_main(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Drizzle" => Self::Drizzle,
            "Rain" => Self::Rain,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" | "Squall"
            | "Tornado" => Self::Atmosphere,
            _ => Self::Other,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Cloudy",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Atmosphere => "Hazy",
            Self::Other => "Unknown",
        }
    }

    /// Icon name for display
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::Clouds => "cloud",
            Self::Drizzle => "cloud_rain",
            Self::Rain => "cloud_rain",
            Self::Thunderstorm => "cloud_lightning",
            Self::Snow => "cloud_snow",
            Self::Atmosphere => "cloud_fog",
            Self::Other => "question",
        }
    }
}

/// Coarse temperature description shown next to the current temperature.
/// Thresholds are in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    Cold,
    Chilly,
    Cool,
    Mild,
    Warm,
    Hot,
    VeryHot,
}

impl TemperatureBand {
    /// Band for a temperature in degrees Celsius
    pub fn from_celsius(temperature: f64) -> Self {
        if temperature < 5.0 {
            Self::Cold
        } else if temperature < 10.0 {
            Self::Chilly
        } else if temperature < 15.0 {
            Self::Cool
        } else if temperature < 20.0 {
            Self::Mild
        } else if temperature < 25.0 {
            Self::Warm
        } else if temperature < 30.0 {
            Self::Hot
        } else {
            Self::VeryHot
        }
    }

    /// Human-readable band name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cold => "Cold",
            Self::Chilly => "Chilly",
            Self::Cool => "Cool",
            Self::Mild => "Mild",
            Self::Warm => "Warm",
            Self::Hot => "Hot",
            Self::VeryHot => "Very Hot",
        }
    }
}

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current weather as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    /// Raw condition group, e.g. "Clear", "Clouds", "Rain"
    pub condition: String,
    pub fetched_at: DateTime<Utc>,
}

/// What the recipe pipeline sees of the weather.
///
/// Either `condition`/`temperature` are set, or `error` explains why not.
/// Immutable once obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: Option<String>,
    pub temperature: Option<f64>,
    pub error: Option<String>,
}

impl WeatherSnapshot {
    /// Snapshot from a successful fetch
    pub fn from_current(current: &CurrentWeather) -> Self {
        Self {
            condition: Some(current.condition.clone()),
            temperature: Some(current.temperature),
            error: None,
        }
    }

    /// Snapshot for a failed lookup
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            condition: None,
            temperature: None,
            error: Some(error.into()),
        }
    }

    /// Condition string, treating an empty one as absent.
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref().filter(|c| !c.is_empty())
    }

    /// Condition parsed into a `WeatherCondition`
    pub fn condition_kind(&self) -> Option<WeatherCondition> {
        self.condition().map(WeatherCondition::from_owm_main)
    }

    /// Only meaningful when the provider was asked for metric units.
    pub fn temperature_band(&self) -> Option<TemperatureBand> {
        self.temperature.map(TemperatureBand::from_celsius)
    }

    pub fn is_available(&self) -> bool {
        self.error.is_none() && self.condition().is_some()
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Permission denied")]
    PermissionDenied,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Weather API error: {0}")]
    Api(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<WeatherError> for moodmeal_core::AppError {
    fn from(e: WeatherError) -> Self {
        use moodmeal_core::{ReqwestErrorExt, WeatherError as CoreWeatherError};

        match e {
            WeatherError::Network(err) => moodmeal_core::AppError::Network(err.into_network_error()),
            WeatherError::Location(err) => {
                CoreWeatherError::LocationUnavailable(err.to_string()).into()
            }
            WeatherError::InvalidApiKey => CoreWeatherError::InvalidApiKey.into(),
            WeatherError::Api(msg) | WeatherError::Parse(msg) => {
                CoreWeatherError::WeatherUnavailable(msg).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owm_main_known_groups() {
        assert_eq!(WeatherCondition::from_owm_main("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_owm_main("Clouds"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::from_owm_main("Rain"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_main("Snow"), WeatherCondition::Snow);
    }

    #[test]
    fn test_owm_main_atmosphere_group() {
        for main in ["Mist", "Fog", "Haze", "Tornado"] {
            assert_eq!(WeatherCondition::from_owm_main(main), WeatherCondition::Atmosphere);
        }
    }

    #[test]
    fn test_owm_main_unknown() {
        assert_eq!(WeatherCondition::from_owm_main("clear"), WeatherCondition::Other);
        assert_eq!(WeatherCondition::from_owm_main(""), WeatherCondition::Other);
    }

    #[test]
    fn test_temperature_band_edges() {
        assert_eq!(TemperatureBand::from_celsius(-3.0), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::from_celsius(5.0), TemperatureBand::Chilly);
        assert_eq!(TemperatureBand::from_celsius(14.9), TemperatureBand::Cool);
        assert_eq!(TemperatureBand::from_celsius(15.0), TemperatureBand::Mild);
        assert_eq!(TemperatureBand::from_celsius(24.0), TemperatureBand::Warm);
        assert_eq!(TemperatureBand::from_celsius(29.9), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::from_celsius(30.0), TemperatureBand::VeryHot);
        assert_eq!(TemperatureBand::VeryHot.label(), "Very Hot");
    }

    #[test]
    fn test_snapshot_unavailable() {
        let snapshot = WeatherSnapshot::unavailable("Permission denied");
        assert!(!snapshot.is_available());
        assert_eq!(snapshot.condition(), None);
        assert_eq!(snapshot.temperature_band(), None);
    }

    #[test]
    fn test_snapshot_empty_condition_is_absent() {
        let snapshot = WeatherSnapshot {
            condition: Some(String::new()),
            temperature: Some(12.0),
            error: None,
        };
        assert_eq!(snapshot.condition(), None);
        assert!(!snapshot.is_available());
    }

    #[test]
    fn test_snapshot_from_current() {
        let current = CurrentWeather {
            temperature: 18.5,
            condition: "Clouds".to_string(),
            fetched_at: Utc::now(),
        };
        let snapshot = WeatherSnapshot::from_current(&current);
        assert_eq!(snapshot.condition(), Some("Clouds"));
        assert_eq!(snapshot.condition_kind(), Some(WeatherCondition::Clouds));
        assert_eq!(snapshot.temperature_band(), Some(TemperatureBand::Mild));
    }

    #[test]
    fn test_error_maps_to_app_error() {
        let err: moodmeal_core::AppError = WeatherError::Location(LocationError::PermissionDenied).into();
        assert!(matches!(
            err,
            moodmeal_core::AppError::Weather(moodmeal_core::WeatherError::LocationUnavailable(_))
        ));
    }
}
