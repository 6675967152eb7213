use serde_json::Value;

mod classify;
mod ingredient;
mod raw;
mod recipe;
mod text;

pub use self::classify::{detect_allergens, ALLERGEN_KEYWORDS};
pub use self::ingredient::{
    categorize, IngredientNormalizer, AISLE_RULES, CATEGORY_OVERRIDES, CATEGORY_RULES,
};
pub use self::recipe::{
    difficulty, difficulty_score, meal_type_from_dish_types, meal_type_from_prep_time,
    RecipeNormalizer, RecipeShape, DIFFICULTY_BUCKETS, DIFFICULTY_FACTORS, DISH_TYPE_RULES,
    PREP_TIME_RULES,
};

pub(crate) use self::raw::{from_value, RawIngredientCandidate, RawResultPage};
pub(crate) use self::text::slug;

/// Converts an upstream JSON payload into a canonical record.
///
/// Normalization never fails: missing or malformed fields fall back to
/// defaults so the output is always well-formed.
pub trait Normalizer {
    type Output;

    fn normalize(&self, raw: &Value) -> Self::Output;
}
