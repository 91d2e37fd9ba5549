//! Centralized error types for the MoodMeal application.
//!
//! This module provides a typed error hierarchy that:
//! - Separates transport, configuration, weather and recipe failures
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for logging
//!
//! Recipe and weather failures are normally absorbed at their service
//! boundary (an empty recipe list, an unknown weather condition). These
//! types exist so that boundary can log something precise.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Recipe service error: {0}")]
    Recipe(#[from] RecipeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Recipe(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    /// Short message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    /// Short message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check the path.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather lookup errors.
///
/// None of these is fatal: the vibe falls back to the generic one when the
/// weather condition is unknown.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Invalid API key")]
    InvalidApiKey,
}

impl WeatherError {
    /// Short message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationUnavailable(_) => {
                "Location unavailable. Showing recipes for any weather."
            }
            WeatherError::WeatherUnavailable(_) => {
                "Weather unavailable. Showing recipes for any weather."
            }
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
        }
    }
}

/// Recipe backend errors.
///
/// Logged at the fetch boundary and converted to an empty result list.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Recipe backend unreachable: {0}")]
    BackendUnreachable(String),

    #[error("Recipe backend returned {status}: {message}")]
    BackendStatus { status: u16, message: String },

    #[error("Malformed recipe response: {0}")]
    BackendMalformedResponse(String),
}

impl RecipeError {
    /// Short message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            RecipeError::BackendUnreachable(_) => {
                "Unable to reach the recipe service. Check your connection."
            }
            RecipeError::BackendStatus { status, .. } if *status >= 500 => {
                "The recipe service is having trouble. Please try again later."
            }
            RecipeError::BackendStatus { .. } => "The recipe request failed. Please try again.",
            RecipeError::BackendMalformedResponse(_) => {
                "Received unexpected recipe data. Please try again."
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
    fn into_recipe_error(self) -> RecipeError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }

    fn into_recipe_error(self) -> RecipeError {
        if self.is_decode() {
            RecipeError::BackendMalformedResponse(self.to_string())
        } else if let Some(status) = self.status() {
            RecipeError::BackendStatus {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            RecipeError::BackendUnreachable(self.to_string())
        }
    }
}
