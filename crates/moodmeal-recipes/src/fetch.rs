//! Recipe backend client.
//!
//! `fetch` is total: transport errors, bad statuses and unparseable bodies
//! are logged and come back as an empty list.

use std::time::Duration;

use async_trait::async_trait;
use moodmeal_core::{RecipeError, RecipesConfig, ReqwestErrorExt};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::recipe::{normalize_payload, Recipe};
use crate::retry::{with_retry, RetryConfig};
use crate::vibe::Vibe;

/// Per-request knobs sent with every fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub limit: u32,
    pub randomize: bool,
}

impl FetchOptions {
    /// Options from the `[recipes]` settings
    pub fn from_config(config: &RecipesConfig) -> Self {
        Self {
            limit: config.limit,
            randomize: config.randomize,
        }
    }
}

/// JSON body posted to the recipe endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest<'a> {
    pub vibe: &'a str,
    pub limit: u32,
    pub randomize: bool,
    /// Fresh per call so identical queries aren't served from an upstream cache
    pub request_id: String,
}

impl<'a> RecipeRequest<'a> {
    pub fn new(vibe: &'a Vibe, options: FetchOptions) -> Self {
        Self {
            vibe: vibe.as_str(),
            limit: options.limit,
            randomize: options.randomize,
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Source of recipes for a vibe
#[async_trait]
pub trait RecipeFetcher: Send + Sync {
    /// Recipes for a vibe. Never fails; problems yield an empty list.
    async fn fetch(&self, vibe: &Vibe, options: FetchOptions) -> Vec<Recipe>;
}

/// Recipe fetcher that POSTs to the recipe backend
pub struct HttpRecipeFetcher {
    client: Client,
    endpoint: String,
    retry: RetryConfig,
}

impl HttpRecipeFetcher {
    /// Create a fetcher with the configured endpoint, timeout and retry policy
    pub fn new(config: &RecipesConfig) -> Result<Self, RecipeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| e.into_recipe_error())?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            retry: RetryConfig::from_config(config),
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Like `fetch`, but reports why nothing came back.
    #[instrument(skip(self), fields(endpoint = %self.endpoint), level = "info")]
    pub async fn try_fetch(
        &self,
        vibe: &Vibe,
        options: FetchOptions,
    ) -> Result<Vec<Recipe>, RecipeError> {
        let body = RecipeRequest::new(vibe, options);

        let response = with_retry(&self.retry, || {
            self.client.post(&self.endpoint).json(&body).send()
        })
        .await
        .map_err(|e| e.into_recipe_error())?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| e.into_recipe_error())?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(RecipeError::BackendStatus {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| RecipeError::BackendMalformedResponse(e.to_string()))?;

        let recipes = normalize_payload(&payload);

        if recipes.is_empty() {
            if let Some(reason) = payload.get("error").and_then(Value::as_str) {
                tracing::debug!("Backend found nothing for {}: {}", vibe, reason);
            }
        }

        tracing::info!("Fetched {} recipes for vibe {}", recipes.len(), vibe);
        Ok(recipes)
    }
}

#[async_trait]
impl RecipeFetcher for HttpRecipeFetcher {
    async fn fetch(&self, vibe: &Vibe, options: FetchOptions) -> Vec<Recipe> {
        match self.try_fetch(vibe, options).await {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!("Recipe fetch for {} failed: {}", vibe, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let vibe = Vibe::new("Cozy");
        let req = RecipeRequest::new(
            &vibe,
            FetchOptions {
                limit: 10,
                randomize: true,
            },
        );

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["vibe"], "Cozy");
        assert_eq!(json["limit"], 10);
        assert_eq!(json["randomize"], true);
        assert!(json["requestId"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[test]
    fn test_request_ids_differ() {
        let vibe = Vibe::new("Any");
        let options = FetchOptions {
            limit: 5,
            randomize: false,
        };
        let a = RecipeRequest::new(&vibe, options);
        let b = RecipeRequest::new(&vibe, options);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_fetcher_uses_configured_endpoint() {
        let config = RecipesConfig {
            base_url: "http://10.0.0.5:5050/".to_string(),
            ..Default::default()
        };
        let fetcher = HttpRecipeFetcher::new(&config).unwrap();
        assert_eq!(fetcher.endpoint(), "http://10.0.0.5:5050/get_best_recipe");
    }
}
