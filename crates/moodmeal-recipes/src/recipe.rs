use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recipe as shown to the user. `title` is the identity key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Recipe {
    /// Create a recipe with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
            ready_in_minutes: None,
            score: None,
            source_url: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Build a recipe from one backend entry.
    ///
    /// Only a non-empty string `title` is required; other fields are kept
    /// when they have the expected JSON type and ignored otherwise.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let title = obj.get("title")?.as_str()?;
        if title.trim().is_empty() {
            return None;
        }

        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            title: title.to_string(),
            image: text("image"),
            ready_in_minutes: obj
                .get("readyInMinutes")
                .and_then(Value::as_f64)
                .map(f64::round)
                .filter(|m| (0.0..=f64::from(u32::MAX)).contains(m))
                .map(|m| m as u32),
            score: obj
                .get("score")
                .and_then(Value::as_f64)
                .filter(|s| s.is_finite()),
            source_url: text("sourceUrl"),
        })
    }

    /// Score used for ranking; a missing score counts as 0.
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Normalize a backend payload into recipes.
///
/// A single object becomes a one-element list, an array is used as-is, and
/// anything else is empty. Entries without a usable title are dropped.
pub fn normalize_payload(payload: &Value) -> Vec<Recipe> {
    match payload {
        Value::Array(items) => items.iter().filter_map(Recipe::from_value).collect(),
        Value::Object(_) => Recipe::from_value(payload).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Ordered recipes with unique titles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecipeResultSet(Vec<Recipe>);

impl RecipeResultSet {
    /// Keep the first recipe seen for each title, preserving order.
    pub fn dedup_by_title(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let mut seen = HashSet::new();
        Self(
            recipes
                .into_iter()
                .filter(|r| seen.insert(r.title.clone()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.0
    }

    /// Titles in display order
    pub fn titles(&self) -> Vec<&str> {
        self.0.iter().map(|r| r.title.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Recipe> {
        self.0
    }

    /// Reorder in place. Removing entries keeps titles unique, so truncation
    /// is allowed too.
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<Recipe> {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a RecipeResultSet {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_object_becomes_one_element() {
        let payload = json!({
            "title": "Miso Soup",
            "image": "https://img.example/miso.jpg",
            "readyInMinutes": 15,
            "sourceUrl": "https://example.com/miso",
            "vibe": "Calm"
        });

        let recipes = normalize_payload(&payload);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Miso Soup");
        assert_eq!(recipes[0].ready_in_minutes, Some(15));
        assert_eq!(recipes[0].source_url.as_deref(), Some("https://example.com/miso"));
        assert_eq!(recipes[0].score, None);
    }

    #[test]
    fn test_array_filters_invalid_entries() {
        let payload = json!([
            { "title": "Ramen", "score": 88 },
            { "title": "" },
            { "title": "   " },
            { "title": 42 },
            { "image": "no-title.jpg" },
            "just a string",
            null,
            { "title": "Curry", "score": "high" }
        ]);

        let recipes = normalize_payload(&payload);
        let titles: Vec<_> = recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Ramen", "Curry"]);
        assert_eq!(recipes[0].score, Some(88.0));
        assert_eq!(recipes[1].score, None);
    }

    #[test]
    fn test_other_payloads_are_empty() {
        assert!(normalize_payload(&json!(null)).is_empty());
        assert!(normalize_payload(&json!("Ramen")).is_empty());
        assert!(normalize_payload(&json!(3)).is_empty());
        assert!(normalize_payload(&json!([])).is_empty());
        assert!(normalize_payload(&json!({ "error": "No recipes found for that vibe." })).is_empty());
    }

    #[test]
    fn test_fractional_minutes_are_rounded() {
        let recipe = Recipe::from_value(&json!({ "title": "Tea", "readyInMinutes": 4.6 })).unwrap();
        assert_eq!(recipe.ready_in_minutes, Some(5));

        let negative = Recipe::from_value(&json!({ "title": "Tea", "readyInMinutes": -3 })).unwrap();
        assert_eq!(negative.ready_in_minutes, None);
    }

    #[test]
    fn test_out_of_range_minutes_are_dropped() {
        let huge = Recipe::from_value(&json!({ "title": "Jerky", "readyInMinutes": 1e12 })).unwrap();
        assert_eq!(huge.title, "Jerky");
        assert_eq!(huge.ready_in_minutes, None);

        let max = Recipe::from_value(&json!({ "title": "Jerky", "readyInMinutes": 4294967295u64 }))
            .unwrap();
        assert_eq!(max.ready_in_minutes, Some(u32::MAX));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let set = RecipeResultSet::dedup_by_title(vec![
            Recipe::new("A").with_score(1.0),
            Recipe::new("B").with_score(2.0),
            Recipe::new("A").with_score(3.0),
        ]);
        assert_eq!(set.titles(), vec!["A", "B"]);
        assert_eq!(set.as_slice()[0].score, Some(1.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut recipe = Recipe::new("Tacos");
        recipe.ready_in_minutes = Some(20);
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json, json!({ "title": "Tacos", "readyInMinutes": 20 }));
    }
}
