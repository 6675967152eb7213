use crate::config::{CacheTtlConfig, EndpointsConfig};
use crate::normalizers::slug;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Upper bound the upstream API accepts for `number`
pub const MAX_RESULTS: u32 = 100;

/// Diet filter names whose tag on normalized recipes is spelled differently
const DIET_TAG_ALIASES: &[(&str, &str)] = &[
    ("paleo", "paleolithic"),
    ("pescetarian", "pescatarian"),
    ("whole30", "whole_30"),
    ("lacto_vegetarian", "vegetarian"),
    ("ovo_vegetarian", "vegetarian"),
    ("lacto_ovo_vegetarian", "vegetarian"),
];

fn diet_tag(diet: &str) -> String {
    let tag = slug(diet);
    DIET_TAG_ALIASES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, alias)| alias.to_string())
        .unwrap_or(tag)
}

/// Upstream endpoints the client can call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    RecipeSearch,
    RecipeInformation,
    RecipeNutrition,
    IngredientSearch,
    IngredientInformation,
    MealPlan,
}

impl Endpoint {
    /// Name used in cache keys and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::RecipeSearch => "recipe_search",
            Endpoint::RecipeInformation => "recipe_information",
            Endpoint::RecipeNutrition => "recipe_nutrition",
            Endpoint::IngredientSearch => "ingredient_search",
            Endpoint::IngredientInformation => "ingredient_information",
            Endpoint::MealPlan => "meal_plan",
        }
    }

    pub(crate) fn template<'a>(&self, endpoints: &'a EndpointsConfig) -> &'a str {
        match self {
            Endpoint::RecipeSearch => &endpoints.recipe_search,
            Endpoint::RecipeInformation => &endpoints.recipe_information,
            Endpoint::RecipeNutrition => &endpoints.recipe_nutrition,
            Endpoint::IngredientSearch => &endpoints.ingredient_search,
            Endpoint::IngredientInformation => &endpoints.ingredient_information,
            Endpoint::MealPlan => &endpoints.meal_plan,
        }
    }

    pub(crate) fn ttl(&self, ttl: &CacheTtlConfig) -> Duration {
        let seconds = match self {
            Endpoint::RecipeSearch => ttl.recipe_search,
            Endpoint::RecipeInformation => ttl.recipe_information,
            Endpoint::RecipeNutrition => ttl.recipe_nutrition,
            Endpoint::IngredientSearch => ttl.ingredient_search,
            Endpoint::IngredientInformation => ttl.ingredient_information,
            Endpoint::MealPlan => ttl.meal_plan,
        };
        Duration::from_secs(seconds)
    }

    /// Path with `{id}` filled in
    pub(crate) fn path(&self, endpoints: &EndpointsConfig, id: Option<u64>) -> String {
        let template = self.template(endpoints);
        match id {
            Some(id) => template.replace("{id}", &id.to_string()),
            None => template.to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for a recipe search
///
/// # Example
/// ```
/// use wellness_recipes::RecipeSearch;
///
/// let search = RecipeSearch::new()
///     .query("curry")
///     .diet("vegetarian")
///     .number(20);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeSearch {
    query: Option<String>,
    cuisine: Option<String>,
    diet: Option<String>,
    intolerances: Vec<String>,
    ingredients: Vec<String>,
    number: Option<u32>,
    offset: u32,
}

impl RecipeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    pub fn intolerance(mut self, intolerance: impl Into<String>) -> Self {
        self.intolerances.push(intolerance.into());
        self
    }

    /// Require recipes that use this ingredient
    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    /// Number of results, clamped to 1..=100
    pub fn number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Whether a recipe with `tags` satisfies the requested diet.
    ///
    /// Comma-separated diets must all match; `|` separates alternatives.
    pub(crate) fn matches_diet(&self, tags: &BTreeSet<String>) -> bool {
        let diet = match self.diet.as_deref().map(str::trim) {
            Some(diet) if !diet.is_empty() => diet,
            _ => return true,
        };
        diet.split(',').all(|required| {
            let alternatives: Vec<String> = required
                .split('|')
                .map(diet_tag)
                .filter(|tag| !tag.is_empty())
                .collect();
            alternatives.is_empty() || alternatives.iter().any(|tag| tags.contains(tag))
        })
    }

    /// Query parameters, excluding the API key
    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |name: &str, value: String| {
            if !value.trim().is_empty() {
                params.push((name.to_string(), value));
            }
        };

        push("query", self.query.clone().unwrap_or_default());
        push("cuisine", self.cuisine.clone().unwrap_or_default());
        push("diet", self.diet.clone().unwrap_or_default());
        push("intolerances", self.intolerances.join(","));
        push("includeIngredients", self.ingredients.join(","));
        push(
            "number",
            self.number.unwrap_or(10).clamp(1, MAX_RESULTS).to_string(),
        );
        push("offset", self.offset.to_string());
        push("addRecipeInformation", "true".to_string());
        push("addRecipeNutrition", "true".to_string());
        push("fillIngredients", "true".to_string());
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFrame {
    #[default]
    Day,
    Week,
}

impl TimeFrame {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Day => "day",
            TimeFrame::Week => "week",
        }
    }
}

/// Parameters for upstream meal-plan generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealPlanRequest {
    target_calories: Option<u32>,
    diet: Option<String>,
    exclude: Vec<String>,
    time_frame: TimeFrame,
}

impl MealPlanRequest {
    pub fn new(time_frame: TimeFrame) -> Self {
        Self {
            time_frame,
            ..Default::default()
        }
    }

    pub fn target_calories(mut self, calories: u32) -> Self {
        self.target_calories = Some(calories);
        self
    }

    pub fn diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    pub fn exclude(mut self, ingredient: impl Into<String>) -> Self {
        self.exclude.push(ingredient.into());
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "timeFrame".to_string(),
            self.time_frame.as_str().to_string(),
        )];
        if let Some(calories) = self.target_calories {
            params.push(("targetCalories".to_string(), calories.to_string()));
        }
        if let Some(diet) = self.diet.as_ref().filter(|d| !d.trim().is_empty()) {
            params.push(("diet".to_string(), diet.clone()));
        }
        if !self.exclude.is_empty() {
            params.push(("exclude".to_string(), self.exclude.join(",")));
        }
        params
    }
}
