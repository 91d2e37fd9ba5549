//! Weather collaborator for MoodMeal
//!
//! Looks up the current condition via OpenWeatherMap for a location and
//! keeps one snapshot per session. Failures never escape as errors to the
//! recipe pipeline: they become a snapshot with `error` set.

pub mod types;
pub mod cache;
pub mod location;
pub mod provider;
pub mod source;

pub use types::*;
pub use cache::WeatherCache;
pub use location::{FixedLocation, LocationProvider};
pub use provider::WeatherProvider;
pub use source::{LocatedWeather, WeatherSource};
