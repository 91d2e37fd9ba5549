use crate::types::{CurrentWeather, Location, WeatherError, WeatherSnapshot};
use chrono::Utc;
use moodmeal_core::{TemperatureUnits, WeatherConfig};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct OwmResponse {
    /// 200 on success; OpenWeatherMap sends it as a number or a string
    cod: Option<Value>,
    message: Option<Value>,
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
}

impl OwmResponse {
    fn cod(&self) -> Option<u16> {
        match self.cod.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|c| u16::try_from(c).ok()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn message(&self) -> String {
        match &self.message {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        }
    }
}

/// OpenWeatherMap current-weather client.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: Option<String>,
    base_url: String,
    units: TemperatureUnits,
}

impl WeatherProvider {
    /// Create a provider from the `[weather]` settings
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units,
        })
    }

    /// Units temperatures are requested in
    pub fn units(&self) -> TemperatureUnits {
        self.units
    }

    pub fn set_units(&mut self, units: TemperatureUnits) {
        self.units = units;
    }

    /// Fetch current conditions for a location.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Location) -> Result<CurrentWeather, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::InvalidApiKey)?;

        let url = format!("{}/data/2.5/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("units", self.units.as_query().to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Raw weather response ({}): {}", status, body);

        let data: OwmResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::Parse(format!("status {}: {}", status, e))
        })?;

        let cod = data.cod().unwrap_or(status.as_u16());
        if cod == 401 {
            return Err(WeatherError::InvalidApiKey);
        }
        if cod != 200 {
            let message = data.message();
            tracing::warn!("Error fetching weather: {}", message);
            return Err(WeatherError::Api(message));
        }

        let main = data
            .main
            .ok_or_else(|| WeatherError::Parse("missing main".to_string()))?;
        let condition = data
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .ok_or_else(|| WeatherError::Parse("missing weather".to_string()))?;

        Ok(CurrentWeather {
            temperature: main.temp,
            condition,
            fetched_at: Utc::now(),
        })
    }

    /// Like `fetch`, but failures become a snapshot carrying the error.
    pub async fn snapshot(&self, location: &Location) -> WeatherSnapshot {
        match self.fetch(location).await {
            Ok(current) => {
                tracing::info!(
                    "Weather: {} at {:.1}",
                    current.condition,
                    current.temperature
                );
                WeatherSnapshot::from_current(&current)
            }
            Err(e) => {
                tracing::warn!("Weather unavailable: {}", e);
                WeatherSnapshot::unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cod_number_and_string() {
        let ok: OwmResponse = serde_json::from_str(r#"{"cod":200}"#).unwrap();
        assert_eq!(ok.cod(), Some(200));

        let not_found: OwmResponse =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert_eq!(not_found.cod(), Some(404));
        assert_eq!(not_found.message(), "city not found");
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let config = WeatherConfig {
            api_key: None,
            ..Default::default()
        };
        let provider = WeatherProvider::new(&config).unwrap();
        let loc = Location {
            latitude: 0.0,
            longitude: 0.0,
        };
        let err = provider.fetch(&loc).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidApiKey));

        let snapshot = provider.snapshot(&loc).await;
        assert!(snapshot.error.is_some());
        assert!(snapshot.condition.is_none());
    }
}
