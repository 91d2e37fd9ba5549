//! Mood symbols, vibes, and the weather x mood lookup table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The moods a user can tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodSymbol {
    /// 🥳
    Excited,
    /// 😌
    Calm,
    /// 🤔
    Reflective,
}

impl MoodSymbol {
    /// Every mood, in display order
    pub const ALL: [MoodSymbol; 3] = [Self::Excited, Self::Calm, Self::Reflective];

    /// The emoji shown on the mood button
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Excited => "🥳",
            Self::Calm => "😌",
            Self::Reflective => "🤔",
        }
    }
}

impl fmt::Display for MoodSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A string that names no mood
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for MoodSymbol {
    type Err = UnknownMood;

    /// Accepts the emoji or the mood name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "🥳" => return Ok(Self::Excited),
            "😌" => return Ok(Self::Calm),
            "🤔" => return Ok(Self::Reflective),
            _ => {}
        }
        match s.to_ascii_lowercase().as_str() {
            "excited" => Ok(Self::Excited),
            "calm" => Ok(Self::Calm),
            "reflective" => Ok(Self::Reflective),
            _ => Err(UnknownMood(s.to_string())),
        }
    }
}

/// Label sent to the recipe backend, e.g. "Cozy" or "Any".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vibe(String);

impl Vibe {
    /// Create a vibe from a backend label
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dish ideas shown alongside the vibe. Empty for vibes outside the
    /// built-in vocabulary.
    pub fn suggested_dishes(&self) -> &'static [&'static str] {
        match self.0.as_str() {
            "Cozy" => &["stew", "soup", "mac and cheese"],
            "Energetic" => &["smoothie", "salad", "protein bowl"],
            "Excited" => &["burger", "pizza", "nachos"],
            "Relaxed" => &["pasta", "risotto", "grilled cheese"],
            "Playful" => &["tacos", "cupcakes", "skewers"],
            "Calm" => &["tea", "rice bowl", "miso soup"],
            "Contemplative" => &["chickpea stew", "lentil soup", "tofu stir fry"],
            "Thoughtful" => &["noodle bowl", "quiche", "baked potato"],
            "Reflective" => &["ramen", "dumplings", "curry"],
            _ => &[],
        }
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Vibe {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Maps (weather condition, mood) to a vibe.
///
/// Conditions are matched exactly against the weather service's group
/// names ("Clear", "Clouds", "Rain").
#[derive(Debug, Clone)]
pub struct VibeResolver {
    table: HashMap<String, HashMap<MoodSymbol, Vibe>>,
}

impl VibeResolver {
    /// A resolver with no entries; every lookup yields `None`.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Add or replace the vibe for a condition and mood
    pub fn with_entry(
        mut self,
        condition: impl Into<String>,
        mood: MoodSymbol,
        vibe: impl Into<Vibe>,
    ) -> Self {
        self.table
            .entry(condition.into())
            .or_default()
            .insert(mood, vibe.into());
        self
    }

    /// `None` means "no vibe available"; callers substitute the generic one.
    pub fn resolve(&self, condition: Option<&str>, mood: MoodSymbol) -> Option<Vibe> {
        self.table.get(condition?)?.get(&mood).cloned()
    }

    /// Weather conditions that have at least one entry
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Default for VibeResolver {
    fn default() -> Self {
        use MoodSymbol::*;

        Self::empty()
            .with_entry("Clear", Excited, "Energetic")
            .with_entry("Clear", Calm, "Calm")
            .with_entry("Clear", Reflective, "Contemplative")
            .with_entry("Clouds", Excited, "Playful")
            .with_entry("Clouds", Calm, "Relaxed")
            .with_entry("Clouds", Reflective, "Thoughtful")
            .with_entry("Rain", Excited, "Excited")
            .with_entry("Rain", Calm, "Cozy")
            .with_entry("Rain", Reflective, "Reflective")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_every_pair() {
        let resolver = VibeResolver::default();
        let expected = [
            ("Clear", MoodSymbol::Excited, "Energetic"),
            ("Clear", MoodSymbol::Calm, "Calm"),
            ("Clear", MoodSymbol::Reflective, "Contemplative"),
            ("Clouds", MoodSymbol::Excited, "Playful"),
            ("Clouds", MoodSymbol::Calm, "Relaxed"),
            ("Clouds", MoodSymbol::Reflective, "Thoughtful"),
            ("Rain", MoodSymbol::Excited, "Excited"),
            ("Rain", MoodSymbol::Calm, "Cozy"),
            ("Rain", MoodSymbol::Reflective, "Reflective"),
        ];

        for (condition, mood, vibe) in expected {
            assert_eq!(
                resolver.resolve(Some(condition), mood),
                Some(Vibe::new(vibe)),
                "{condition} / {mood:?}"
            );
        }
    }

    #[test]
    fn test_unknown_condition() {
        let resolver = VibeResolver::default();
        for mood in MoodSymbol::ALL {
            assert_eq!(resolver.resolve(Some("Snow"), mood), None);
            assert_eq!(resolver.resolve(Some("clear"), mood), None);
            assert_eq!(resolver.resolve(None, mood), None);
        }
    }

    #[test]
    fn test_missing_mood_entry() {
        let resolver = VibeResolver::empty().with_entry("Clear", MoodSymbol::Calm, "Calm");
        assert_eq!(resolver.resolve(Some("Clear"), MoodSymbol::Excited), None);
        assert_eq!(
            resolver.resolve(Some("Clear"), MoodSymbol::Calm),
            Some(Vibe::new("Calm"))
        );
    }

    #[test]
    fn test_mood_parsing() {
        assert_eq!("🥳".parse::<MoodSymbol>(), Ok(MoodSymbol::Excited));
        assert_eq!("calm".parse::<MoodSymbol>(), Ok(MoodSymbol::Calm));
        assert_eq!(" Reflective ".parse::<MoodSymbol>(), Ok(MoodSymbol::Reflective));
        assert!("😡".parse::<MoodSymbol>().is_err());
    }

    #[test]
    fn test_suggested_dishes() {
        assert_eq!(Vibe::new("Cozy").suggested_dishes()[0], "stew");
        assert!(Vibe::new("Any").suggested_dishes().is_empty());
    }

    #[test]
    fn test_vibe_serializes_as_plain_string() {
        let json = serde_json::to_string(&Vibe::new("Cozy")).unwrap();
        assert_eq!(json, r#""Cozy""#);
    }
}
