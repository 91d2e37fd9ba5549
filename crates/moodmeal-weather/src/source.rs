use async_trait::async_trait;

use crate::location::LocationProvider;
use crate::provider::WeatherProvider;
use crate::types::WeatherSnapshot;

/// Anything that can report the current weather as a snapshot.
///
/// Implementations never fail: problems are carried in `WeatherSnapshot::error`.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self) -> WeatherSnapshot;
}

/// Resolves the device location, then asks the provider for that spot.
pub struct LocatedWeather<L> {
    provider: WeatherProvider,
    locator: L,
}

impl<L: LocationProvider> LocatedWeather<L> {
    /// Pair a weather provider with a location provider
    pub fn new(provider: WeatherProvider, locator: L) -> Self {
        Self { provider, locator }
    }
}

#[async_trait]
impl<L: LocationProvider> WeatherSource for LocatedWeather<L> {
    async fn current(&self) -> WeatherSnapshot {
        let location = match self.locator.current_location().await {
            Ok(loc) => {
                tracing::info!("Got location: {}, {}", loc.latitude, loc.longitude);
                loc
            }
            Err(e) => {
                tracing::warn!("Location unavailable: {}", e);
                return WeatherSnapshot::unavailable(e.to_string());
            }
        };

        self.provider.snapshot(&location).await
    }
}

/// A snapshot that was obtained elsewhere.
#[async_trait]
impl WeatherSource for WeatherSnapshot {
    async fn current(&self) -> WeatherSnapshot {
        self.clone()
    }
}
