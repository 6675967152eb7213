pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod normalizers;
pub mod quota;
pub mod units;

// Re-export main types
pub use cache::{cache_key, CacheStore, MemoryCache};
pub use client::{Endpoint, MealPlanRequest, RecipeApiClient, RecipeSearch, TimeFrame};
pub use config::RecipeApiConfig;
pub use error::RecipeApiError;
pub use import::{bulk_import, BulkImportReport, BulkImporter, SkippedImport};
pub use model::{
    Difficulty, Ingredient, IngredientCategory, InstructionStep, MealType, Nutrition100g, Recipe,
    RecipeIngredientLine, ServingNutrition,
};
pub use normalizers::{IngredientNormalizer, Normalizer, RecipeNormalizer};
pub use quota::{MemoryQuotaTracker, QuotaGuard, QuotaState, QuotaTracker, Reservation};
pub use units::to_metric;

use serde_json::Value;

/// Normalize a raw recipe payload
///
/// # Example
/// ```
/// use serde_json::json;
///
/// let recipe = wellness_recipes::normalize_recipe(&json!({
///     "title": "Toast",
///     "dishTypes": ["breakfast"]
/// }));
/// assert_eq!(recipe.meal_type, wellness_recipes::MealType::Breakfast);
/// ```
pub fn normalize_recipe(raw: &Value) -> Recipe {
    RecipeNormalizer.normalize(raw)
}

/// Normalize a raw ingredient payload
pub fn normalize_ingredient(raw: &Value) -> Ingredient {
    IngredientNormalizer.normalize(raw)
}
