//! Core types for the vocabulary deck.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// User mastery rating on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: Rating = Rating(1);
    pub const MAX: Rating = Rating(5);

    /// Create from a numeric value, rejecting anything outside 1-5.
    pub fn from_value(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    /// Create from any integer, clamping into 1-5.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(1, 5) as u8)
    }

    pub fn to_value(self) -> u8 {
        self.0
    }

    /// Lenient conversion used for feed data.
    /// Missing, empty or non-numeric values fall back to 1; numbers are
    /// truncated and clamped.
    fn from_json(value: &Value) -> Self {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(n) if n.is_finite() => Self::clamped(n.trunc() as i64),
            _ => Self::MIN,
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::MIN
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// One vocabulary entry as published by the data feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(deserialize_with = "required_text")]
    pub en: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub cz: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub pron: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub meaning_en: Option<String>,
    #[serde(default)]
    pub rating: Rating,
}

impl WordRecord {
    /// Create a record with only the headword and baseline rating set.
    pub fn new(en: impl Into<String>, rating: Rating) -> Self {
        Self {
            en: en.into(),
            cz: None,
            pron: None,
            example: None,
            meaning_en: None,
            rating,
        }
    }
}

fn text_of(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

fn required_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Which language side of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    En,
    Cz,
}

/// Which language is shown before reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    PromptEn,
    PromptCz,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::PromptEn
    }
}

impl Orientation {
    /// Side shown before reveal.
    pub fn prompt_side(self) -> Side {
        match self {
            Self::PromptEn => Side::En,
            Self::PromptCz => Side::Cz,
        }
    }

    /// Side shown after reveal.
    pub fn answer_side(self) -> Side {
        match self {
            Self::PromptEn => Side::Cz,
            Self::PromptCz => Side::En,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::PromptEn => Self::PromptCz,
            Self::PromptCz => Self::PromptEn,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PromptEn => "EN → CZ",
            Self::PromptCz => "CZ → EN",
        }
    }
}

/// Predicate class narrowing the deck by effective rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCriterion {
    All,
    Weak,
    Medium,
    Strong,
}

impl Default for FilterCriterion {
    fn default() -> Self {
        Self::All
    }
}

impl FilterCriterion {
    pub fn matches(self, rating: Rating) -> bool {
        let r = rating.to_value();
        match self {
            Self::All => true,
            Self::Weak => r <= 2,
            Self::Medium => r == 3,
            Self::Strong => r >= 4,
        }
    }

    /// Get the criterion name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "weak" => Some(Self::Weak),
            "medium" => Some(Self::Medium),
            "strong" => Some(Self::Strong),
            _ => None,
        }
    }

    /// Next criterion in display order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Weak,
            Self::Weak => Self::Medium,
            Self::Medium => Self::Strong,
            Self::Strong => Self::All,
        }
    }
}

/// Body of the data-version endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}
