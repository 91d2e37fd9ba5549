//! Merging primary and fallback results and ordering them for display.

use std::future::Future;

use moodmeal_core::{OrderingPolicy, RecipesConfig};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::recipe::{Recipe, RecipeResultSet};

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub recipes: RecipeResultSet,
    pub used_fallback: bool,
}

/// Fallback threshold and display ordering for one session
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    min_acceptable: usize,
    display_cap: usize,
    ordering: OrderingPolicy,
}

impl ResultAggregator {
    /// Create an aggregator with explicit settings
    pub fn new(min_acceptable: usize, ordering: OrderingPolicy, display_cap: usize) -> Self {
        Self {
            min_acceptable,
            display_cap,
            ordering,
        }
    }

    /// Create an aggregator from the `[recipes]` settings
    pub fn from_config(config: &RecipesConfig) -> Self {
        Self::new(config.min_acceptable, config.ordering, config.display_cap)
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    /// Merge without ordering.
    ///
    /// When the primary list has at least `min_acceptable` entries, as
    /// returned, the fallback is never called. Otherwise the fallback results
    /// are appended. Duplicate titles are dropped first-seen-wins either way,
    /// so a primary copy always beats a fallback copy.
    pub async fn merge<F, Fut>(&self, primary: Vec<Recipe>, fallback: F) -> Aggregation
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Recipe>>,
    {
        if primary.len() >= self.min_acceptable {
            return Aggregation {
                recipes: RecipeResultSet::dedup_by_title(primary),
                used_fallback: false,
            };
        }

        tracing::info!(
            "Only {} primary recipes (need {}), fetching fallback",
            primary.len(),
            self.min_acceptable
        );
        let extra = fallback().await;
        let recipes = RecipeResultSet::dedup_by_title(primary.into_iter().chain(extra));

        Aggregation {
            recipes,
            used_fallback: true,
        }
    }

    /// Merge, then apply the display ordering.
    pub async fn aggregate<F, Fut>(&self, primary: Vec<Recipe>, fallback: F) -> Aggregation
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Recipe>>,
    {
        let mut aggregation = self.merge(primary, fallback).await;
        aggregation.recipes = self.order(aggregation.recipes);
        aggregation
    }

    /// Apply the display ordering using the thread-local RNG
    pub fn order(&self, recipes: RecipeResultSet) -> RecipeResultSet {
        self.order_with_rng(recipes, &mut rand::thread_rng())
    }

    /// Apply the display ordering with a caller-supplied random source.
    pub fn order_with_rng<R: Rng + ?Sized>(
        &self,
        mut recipes: RecipeResultSet,
        rng: &mut R,
    ) -> RecipeResultSet {
        let list = recipes.as_mut_vec();
        match self.ordering {
            OrderingPolicy::Randomized => list.shuffle(rng),
            OrderingPolicy::ScoreRanked => {
                list.sort_by(|a, b| b.score_or_zero().total_cmp(&a.score_or_zero()));
                list.truncate(self.display_cap);
            }
        }
        recipes
    }
}
