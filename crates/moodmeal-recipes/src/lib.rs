//! Recipe orchestration for MoodMeal.
//!
//! Turns a mood tap plus the session weather into a vibe, asks the recipe
//! backend for matches (with a broader fallback query when too few come
//! back) and shapes the merged list for display.

pub mod aggregate;
pub mod fetch;
pub mod orchestrator;
pub mod recipe;
pub mod retry;
pub mod vibe;

pub use aggregate::{Aggregation, ResultAggregator};
pub use fetch::{FetchOptions, HttpRecipeFetcher, RecipeFetcher, RecipeRequest};
pub use orchestrator::{
    CycleOutcome, CyclePhase, OrchestrationController, OrchestrationMessage, RecipeView,
};
pub use recipe::{normalize_payload, Recipe, RecipeResultSet};
pub use retry::RetryConfig;
pub use vibe::{MoodSymbol, UnknownMood, Vibe, VibeResolver};
