use super::classify::detect_allergens;
use super::raw::{
    from_value, RawInstructionGroup, RawNamedItem, RawRecipe, RawRecipeIngredient,
};
use super::text::{decode, slug, split_steps, strip_html};
use super::Normalizer;
use crate::model::{
    Difficulty, InstructionStep, MealType, Recipe, RecipeIngredientLine, ServingNutrition,
};
use crate::units::{canonical_unit, to_metric};
use log::debug;
use serde_json::Value;
use std::collections::BTreeSet;

/// Dish-type tags in priority order; the first tag present on the recipe wins
pub const DISH_TYPE_RULES: &[(&str, MealType)] = &[
    ("breakfast", MealType::Breakfast),
    ("brunch", MealType::Breakfast),
    ("morning meal", MealType::Breakfast),
    ("dinner", MealType::Dinner),
    ("main course", MealType::Dinner),
    ("main dish", MealType::Dinner),
    ("lunch", MealType::Lunch),
    ("side dish", MealType::Lunch),
    ("salad", MealType::Lunch),
    ("soup", MealType::Lunch),
    ("snack", MealType::Snack),
    ("appetizer", MealType::Snack),
    ("antipasti", MealType::Snack),
    ("starter", MealType::Snack),
    ("fingerfood", MealType::Snack),
    ("dessert", MealType::Snack),
    ("beverage", MealType::Snack),
    ("drink", MealType::Snack),
];

/// Ascending prep-time ceilings (minutes, inclusive) used when no dish type matches
pub const PREP_TIME_RULES: &[(u32, MealType)] = &[
    (10, MealType::Snack),
    (20, MealType::Breakfast),
    (45, MealType::Lunch),
];

/// Meal type for recipes with no usable signal at all
pub const DEFAULT_MEAL_TYPE: MealType = MealType::Dinner;

/// Point thresholds per difficulty factor: above the first earns 1, above the second 2
pub const DIFFICULTY_FACTORS: &[(&str, fn(&RecipeShape) -> u32, [u32; 2])] = &[
    ("prep_minutes", RecipeShape::prep, [15, 30]),
    ("cook_minutes", RecipeShape::cook, [30, 60]),
    ("ingredients", RecipeShape::ingredients, [7, 12]),
    ("steps", RecipeShape::steps, [5, 10]),
];

/// Highest total score (inclusive) for each difficulty, checked in order
pub const DIFFICULTY_BUCKETS: &[(u32, Difficulty)] =
    &[(2, Difficulty::Easy), (5, Difficulty::Medium)];

/// Figures the difficulty score is computed from
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeShape {
    pub prep_minutes: u32,
    pub cook_minutes: u32,
    pub ingredient_count: u32,
    pub step_count: u32,
}

impl RecipeShape {
    fn prep(&self) -> u32 {
        self.prep_minutes
    }

    fn cook(&self) -> u32 {
        self.cook_minutes
    }

    fn ingredients(&self) -> u32 {
        self.ingredient_count
    }

    fn steps(&self) -> u32 {
        self.step_count
    }
}

/// Map dish-type tags to a meal type, if any tag is known
pub fn meal_type_from_dish_types(dish_types: &[String]) -> Option<MealType> {
    let tags: Vec<String> = dish_types
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .collect();
    DISH_TYPE_RULES
        .iter()
        .find(|(tag, _)| tags.iter().any(|t| t == tag))
        .map(|(_, meal_type)| *meal_type)
}

/// Meal type from preparation time; 0 means unknown
pub fn meal_type_from_prep_time(prep_minutes: u32) -> MealType {
    if prep_minutes == 0 {
        return DEFAULT_MEAL_TYPE;
    }
    PREP_TIME_RULES
        .iter()
        .find(|(ceiling, _)| prep_minutes <= *ceiling)
        .map(|(_, meal_type)| *meal_type)
        .unwrap_or(MealType::Dinner)
}

pub fn difficulty_score(shape: &RecipeShape) -> u32 {
    DIFFICULTY_FACTORS
        .iter()
        .map(|(_, factor, [low, high])| {
            let value = factor(shape);
            if value > *high {
                2
            } else if value > *low {
                1
            } else {
                0
            }
        })
        .sum()
}

pub fn difficulty(shape: &RecipeShape) -> Difficulty {
    let score = difficulty_score(shape);
    DIFFICULTY_BUCKETS
        .iter()
        .find(|(ceiling, _)| score <= *ceiling)
        .map(|(_, difficulty)| *difficulty)
        .unwrap_or(Difficulty::Hard)
}

/// Turns raw recipe payloads into canonical [`Recipe`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeNormalizer;

impl RecipeNormalizer {
    fn convert_ingredient(raw: &RawRecipeIngredient) -> RecipeIngredientLine {
        let name = if raw.name_clean.trim().is_empty() {
            raw.name.trim().to_string()
        } else {
            raw.name_clean.trim().to_string()
        };
        let unit = canonical_unit(&raw.unit)
            .map(str::to_string)
            .unwrap_or_else(|| raw.unit.trim().to_lowercase());
        let original_string = if raw.original.is_empty() {
            raw.name.clone()
        } else {
            raw.original.clone()
        };

        RecipeIngredientLine {
            source_id: raw.id,
            name,
            quantity: to_metric(raw.amount, &raw.unit),
            unit,
            original_string,
        }
    }

    fn flatten_instructions(
        groups: &[RawInstructionGroup],
        fallback: &str,
    ) -> Vec<InstructionStep> {
        let names = |items: &[RawNamedItem]| -> Vec<String> {
            items
                .iter()
                .map(|item| item.name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect()
        };

        let steps: Vec<InstructionStep> = groups
            .iter()
            .flat_map(|group| group.steps.iter())
            .filter(|step| !step.step.trim().is_empty())
            .enumerate()
            .map(|(index, step)| InstructionStep {
                number: index as u32 + 1,
                description: decode(&step.step),
                ingredients: names(&step.ingredients),
                equipment: names(&step.equipment),
            })
            .collect();
        if !steps.is_empty() {
            return steps;
        }

        split_steps(fallback)
            .into_iter()
            .enumerate()
            .map(|(index, description)| InstructionStep {
                number: index as u32 + 1,
                description,
                ..Default::default()
            })
            .collect()
    }

    fn dietary_tags(raw: &RawRecipe) -> BTreeSet<String> {
        let mut tags: BTreeSet<String> = raw
            .diets
            .iter()
            .map(|diet| slug(diet))
            .filter(|tag| !tag.is_empty())
            .collect();

        let implies_vegetarian = raw.vegetarian
            || raw.vegan
            || tags.iter().any(|tag| tag == "vegan" || tag.contains("vegetarian"));

        let flags = [
            (implies_vegetarian, "vegetarian"),
            (raw.vegan, "vegan"),
            (raw.gluten_free, "gluten_free"),
            (raw.dairy_free, "dairy_free"),
            (raw.very_healthy, "healthy"),
            (raw.cheap, "budget_friendly"),
            (raw.very_popular, "popular"),
            (raw.low_fodmap, "low_fodmap"),
        ];
        for (set, tag) in flags {
            if set {
                tags.insert(tag.to_string());
            }
        }
        tags
    }

    fn nutrition(raw: &RawRecipe) -> ServingNutrition {
        let nutrition = &raw.nutrition;
        ServingNutrition {
            calories: nutrition.amount_of("Calories"),
            protein: nutrition.amount_of("Protein"),
            carbs: nutrition.amount_of("Carbohydrates"),
            fat: nutrition.amount_of("Fat"),
            fiber: nutrition.amount_of("Fiber"),
        }
    }

    /// Normalize an already-parsed raw recipe
    pub(crate) fn from_raw(raw: &RawRecipe) -> Recipe {
        let ingredients: Vec<RecipeIngredientLine> = raw
            .extended_ingredients
            .iter()
            .map(Self::convert_ingredient)
            .collect();
        let instructions =
            Self::flatten_instructions(&raw.analyzed_instructions, &raw.instructions);

        let prep_minutes = raw.preparation_minutes;
        let cook_minutes = raw.cooking_minutes;
        let total_minutes = if raw.ready_in_minutes > 0 {
            raw.ready_in_minutes
        } else {
            prep_minutes.saturating_add(cook_minutes)
        };

        let meal_type = meal_type_from_dish_types(&raw.dish_types).unwrap_or_else(|| {
            let prep = if prep_minutes > 0 { prep_minutes } else { total_minutes };
            debug!(
                "No dish type matched for recipe {}, inferring from {} min prep",
                raw.id, prep
            );
            meal_type_from_prep_time(prep)
        });

        let shape = RecipeShape {
            prep_minutes,
            cook_minutes,
            ingredient_count: ingredients.len() as u32,
            step_count: instructions.len() as u32,
        };

        let allergen_text = ingredients
            .iter()
            .flat_map(|line| [line.name.as_str(), line.original_string.as_str()])
            .collect::<Vec<_>>()
            .join(" ");

        Recipe {
            source_id: raw.id,
            title: decode(&raw.title),
            summary: strip_html(&raw.summary),
            cuisine: raw
                .cuisines
                .first()
                .map(|cuisine| cuisine.trim().to_string())
                .unwrap_or_default(),
            meal_type,
            servings: raw.servings.max(1),
            prep_minutes,
            cook_minutes,
            total_minutes,
            difficulty: difficulty(&shape),
            dietary_tags: Self::dietary_tags(raw),
            allergens: detect_allergens(&allergen_text),
            ingredients,
            instructions,
            nutrition: Self::nutrition(raw),
            image_url: raw.image.trim().to_string(),
            source_url: raw.source_url.trim().to_string(),
            verified: raw.id != 0,
        }
    }
}

impl Normalizer for RecipeNormalizer {
    type Output = Recipe;

    fn normalize(&self, raw: &Value) -> Recipe {
        Self::from_raw(&from_value::<RawRecipe>(raw))
    }
}
