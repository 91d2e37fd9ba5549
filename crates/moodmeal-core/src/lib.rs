pub mod config;
pub mod error;

pub use config::{
    Config, OrderingPolicy, RecipesConfig, TemperatureUnits, ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, NetworkError, RecipeError, ReqwestErrorExt, WeatherError};

use anyhow::Result;

/// Initialize logging for the MoodMeal core.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    tracing::info!("MoodMeal core initialized");
    Ok(())
}
