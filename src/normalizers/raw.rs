//! Upstream payload shapes.
//!
//! Every field is optional and deserialized leniently: a null, a missing key
//! or a value of the wrong type becomes the field's default instead of an
//! error. Nothing in here leaves the normalizers module.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) mod lenient {
    use super::*;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let parsed = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().unwrap_or_default(),
            Value::String(s) => s
                .trim()
                .trim_end_matches(|c: char| c.is_alphabetic())
                .trim()
                .parse()
                .unwrap_or_default(),
            _ => 0.0,
        };
        Ok(if parsed.is_finite() { parsed } else { 0.0 })
    }

    /// Non-negative whole number; negatives (upstream uses -1 for unknown) become 0
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
        let value = number(d)?;
        Ok(if value > 0.0 {
            value.round().min(u32::MAX as f64) as u32
        } else {
            0
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        let value = number(d)?;
        Ok(if value > 0.0 { value as u64 } else { 0 })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => s.eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    /// List of strings; a bare string becomes a one-element list
    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Value::String(s) if !s.trim().is_empty() => vec![s],
            _ => Vec::new(),
        })
    }

    /// List of records; malformed entries are dropped
    pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn object<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
    }
}

/// Parse any JSON value into a raw record, falling back to the default
pub(crate) fn from_value<T: DeserializeOwned + Default>(value: &Value) -> T {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawRecipe {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(deserialize_with = "lenient::strings")]
    pub cuisines: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub dish_types: Vec<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub diets: Vec<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub servings: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub preparation_minutes: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub cooking_minutes: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub ready_in_minutes: u32,
    #[serde(deserialize_with = "lenient::flag")]
    pub vegetarian: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub vegan: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub gluten_free: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub dairy_free: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub very_healthy: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub cheap: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub very_popular: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub low_fodmap: bool,
    #[serde(deserialize_with = "lenient::list")]
    pub extended_ingredients: Vec<RawRecipeIngredient>,
    #[serde(deserialize_with = "lenient::list")]
    pub analyzed_instructions: Vec<RawInstructionGroup>,
    #[serde(deserialize_with = "lenient::string")]
    pub instructions: String,
    #[serde(deserialize_with = "lenient::object")]
    pub nutrition: RawNutrition,
    #[serde(deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(deserialize_with = "lenient::string")]
    pub source_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RawRecipeIngredient {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name_clean: String,
    #[serde(deserialize_with = "lenient::string")]
    pub original: String,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient::string")]
    pub unit: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawInstructionGroup {
    #[serde(deserialize_with = "lenient::list")]
    pub steps: Vec<RawStep>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawStep {
    #[serde(deserialize_with = "lenient::string")]
    pub step: String,
    #[serde(deserialize_with = "lenient::list")]
    pub ingredients: Vec<RawNamedItem>,
    #[serde(deserialize_with = "lenient::list")]
    pub equipment: Vec<RawNamedItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawNamedItem {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawNutrition {
    #[serde(deserialize_with = "lenient::list")]
    pub nutrients: Vec<RawNutrient>,
}

impl RawNutrition {
    /// Amount of the first nutrient called `name` (case-insensitive), else 0
    pub fn amount_of(&self, name: &str) -> f64 {
        self.nutrients
            .iter()
            .find(|nutrient| nutrient.name.trim().eq_ignore_ascii_case(name))
            .map(|nutrient| nutrient.amount)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawNutrient {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawIngredient {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub original: String,
    #[serde(deserialize_with = "lenient::number")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient::string")]
    pub unit: String,
    #[serde(deserialize_with = "lenient::string")]
    pub aisle: String,
    #[serde(deserialize_with = "lenient::object")]
    pub nutrition: RawNutrition,
}

/// One page of search results; recipes stay raw until normalized
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawResultPage {
    #[serde(deserialize_with = "lenient::list")]
    pub results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawIngredientCandidate {
    #[serde(deserialize_with = "lenient::id")]
    pub id: u64,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
}
