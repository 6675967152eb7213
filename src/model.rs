use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Canonical meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    #[default]
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grocery category of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngredientCategory {
    Produce,
    Proteins,
    Dairy,
    Grains,
    Pantry,
    Beverages,
    #[default]
    Other,
}

impl IngredientCategory {
    pub const ALL: [IngredientCategory; 7] = [
        IngredientCategory::Produce,
        IngredientCategory::Proteins,
        IngredientCategory::Dairy,
        IngredientCategory::Grains,
        IngredientCategory::Pantry,
        IngredientCategory::Beverages,
        IngredientCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientCategory::Produce => "produce",
            IngredientCategory::Proteins => "proteins",
            IngredientCategory::Dairy => "dairy",
            IngredientCategory::Grains => "grains",
            IngredientCategory::Pantry => "pantry",
            IngredientCategory::Beverages => "beverages",
            IngredientCategory::Other => "other",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition for one serving of a recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServingNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

/// Nutrition for 100 g of an ingredient; sodium in mg, the rest in g or kcal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition100g {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientLine {
    pub source_id: u64,
    pub name: String,
    /// Grams or millilitres when the upstream unit is known
    pub quantity: f64,
    pub unit: String,
    /// Verbatim upstream text
    pub original_string: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub number: u32,
    pub description: String,
    pub ingredients: Vec<String>,
    pub equipment: Vec<String>,
}

/// Canonical recipe record. Every field has a safe default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub source_id: u64,
    pub title: String,
    pub summary: String,
    pub cuisine: String,
    pub meal_type: MealType,
    pub servings: u32,
    pub prep_minutes: u32,
    pub cook_minutes: u32,
    pub total_minutes: u32,
    pub difficulty: Difficulty,
    pub dietary_tags: BTreeSet<String>,
    pub allergens: BTreeSet<String>,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub instructions: Vec<InstructionStep>,
    pub nutrition: ServingNutrition,
    pub image_url: String,
    pub source_url: String,
    pub verified: bool,
}

/// Canonical ingredient record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub source_id: u64,
    pub name: String,
    pub name_clean: String,
    pub nutrition: Nutrition100g,
    pub category: IngredientCategory,
    pub dietary_tags: BTreeSet<String>,
    pub allergens: BTreeSet<String>,
    pub verified: bool,
}
