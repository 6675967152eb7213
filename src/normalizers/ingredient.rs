use super::classify::{detect_allergens, mentions_animal_product, mentions_meat_or_fish};
use super::raw::{from_value, RawIngredient};
use super::text::{clean_name, decode};
use super::Normalizer;
use crate::model::{Ingredient, IngredientCategory, Nutrition100g};
use crate::units::{metric_base, to_metric, MetricBase};
use serde_json::Value;
use std::collections::BTreeSet;

/// Compound names whose category differs from a shorter keyword they contain.
/// Checked before [`CATEGORY_RULES`].
pub const CATEGORY_OVERRIDES: &[(&str, IngredientCategory)] = &[
    ("eggplant", IngredientCategory::Produce),
    ("butternut", IngredientCategory::Produce),
    ("green bean", IngredientCategory::Produce),
    ("snap pea", IngredientCategory::Produce),
    ("peanut", IngredientCategory::Pantry),
    ("peppercorn", IngredientCategory::Pantry),
    ("cornstarch", IngredientCategory::Pantry),
    ("corn starch", IngredientCategory::Pantry),
    ("cornmeal", IngredientCategory::Grains),
    ("graham", IngredientCategory::Grains),
    ("buckwheat", IngredientCategory::Grains),
    ("coconut milk", IngredientCategory::Pantry),
    ("champagne", IngredientCategory::Beverages),
];

/// Category keywords matched against the cleaned name, first hit wins.
///
/// Proteins and dairy come before produce so "chicken stock" does not land
/// in produce; "pepper" is only produce as "bell pepper".
pub const CATEGORY_RULES: &[(IngredientCategory, &[&str])] = &[
    (
        IngredientCategory::Beverages,
        &[
            "juice", "coffee", "tea bag", "black tea", "green tea", "soda", "wine", "beer",
            "sparkling water", "mineral water", "kombucha",
        ],
    ),
    (
        IngredientCategory::Proteins,
        &[
            "chicken", "beef", "pork", "lamb", "turkey", "bacon", "ham", "sausage", "steak",
            "veal", "duck", "fish", "salmon", "tuna", "cod", "shrimp", "prawn", "crab", "tofu",
            "tempeh", "seitan", "egg", "lentil", "chickpea", "bean", "meat",
        ],
    ),
    (
        IngredientCategory::Dairy,
        &[
            "milk", "cheese", "yogurt", "yoghurt", "butter", "cream", "ghee", "kefir",
            "parmesan", "mozzarella", "ricotta",
        ],
    ),
    (
        IngredientCategory::Grains,
        &[
            "rice", "pasta", "spaghetti", "noodle", "bread", "flour", "oat", "quinoa", "barley",
            "couscous", "bulgur", "cereal", "tortilla", "cracker", "wheat", "rye",
        ],
    ),
    (
        IngredientCategory::Produce,
        &[
            "apple", "banana", "berry", "berries", "lemon", "lime", "orange", "grape", "mango",
            "pineapple", "peach", "pear", "cherry", "avocado", "tomato", "potato", "onion",
            "garlic", "carrot", "celery", "cucumber", "lettuce", "spinach", "kale", "cabbage",
            "broccoli", "cauliflower", "zucchini", "squash", "eggplant", "mushroom",
            "bell pepper", "chili", "ginger", "basil", "cilantro", "parsley", "mint", "leek",
            "pea", "corn", "beet", "radish", "arugula",
        ],
    ),
    (
        IngredientCategory::Pantry,
        &[
            "oil", "vinegar", "salt", "pepper", "sugar", "honey", "syrup", "sauce", "ketchup",
            "mustard", "mayonnaise", "spice", "cinnamon", "cumin", "paprika", "oregano",
            "vanilla", "baking", "yeast", "stock", "broth", "nut", "seed", "cocoa", "chocolate",
            "jam",
        ],
    ),
];

/// Upstream aisle names, consulted when the ingredient name matches nothing
pub const AISLE_RULES: &[(IngredientCategory, &[&str])] = &[
    (IngredientCategory::Produce, &["produce"]),
    (IngredientCategory::Proteins, &["meat", "seafood"]),
    (IngredientCategory::Dairy, &["milk", "cheese", "dairy"]),
    (IngredientCategory::Grains, &["pasta and rice", "bakery", "bread", "cereal"]),
    (
        IngredientCategory::Pantry,
        &["baking", "spices", "condiments", "oil", "canned", "nut butters", "sweet"],
    ),
    (IngredientCategory::Beverages, &["beverages", "alcoholic", "tea and coffee"]),
];

fn first_rule_match(
    text: &str,
    rules: &[(IngredientCategory, &[&str])],
) -> Option<IngredientCategory> {
    if text.is_empty() {
        return None;
    }
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(category, _)| *category)
}

fn override_match(text: &str) -> Option<IngredientCategory> {
    CATEGORY_OVERRIDES
        .iter()
        .find(|(name, _)| text.contains(name))
        .map(|(_, category)| *category)
}

/// Category from the cleaned name, then the aisle, else `Other`
pub fn categorize(name_clean: &str, aisle: &str) -> IngredientCategory {
    override_match(name_clean)
        .or_else(|| first_rule_match(name_clean, CATEGORY_RULES))
        .or_else(|| first_rule_match(&aisle.trim().to_lowercase(), AISLE_RULES))
        .unwrap_or(IngredientCategory::Other)
}

/// `vegetarian` when no meat or fish is named, plus `vegan` when no animal product is
pub fn dietary_tags(name_clean: &str) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    if !mentions_meat_or_fish(name_clean) {
        tags.insert("vegetarian".to_string());
        if !mentions_animal_product(name_clean) {
            tags.insert("vegan".to_string());
        }
    }
    tags
}

/// Turns raw ingredient payloads into canonical [`Ingredient`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct IngredientNormalizer;

impl IngredientNormalizer {
    /// Factor that brings reported nutrient amounts to a 100 g basis.
    ///
    /// Payloads reported per piece or per volume have no mass to scale by
    /// and keep their amounts as reported.
    fn per_100g_factor(raw: &RawIngredient) -> f64 {
        if metric_base(&raw.unit) != Some(MetricBase::Grams) {
            return 1.0;
        }
        let grams = to_metric(raw.amount, &raw.unit);
        if grams > 0.0 {
            100.0 / grams
        } else {
            1.0
        }
    }

    fn nutrition(raw: &RawIngredient) -> Nutrition100g {
        let factor = Self::per_100g_factor(raw);
        let amount = |name: &str| raw.nutrition.amount_of(name) * factor;
        Nutrition100g {
            calories: amount("Calories"),
            protein: amount("Protein"),
            carbs: amount("Carbohydrates"),
            fat: amount("Fat"),
            fiber: amount("Fiber"),
            sugar: amount("Sugar"),
            sodium: amount("Sodium"),
        }
    }

    pub(crate) fn from_raw(raw: &RawIngredient) -> Ingredient {
        let name = if raw.name.trim().is_empty() {
            decode(&raw.original)
        } else {
            decode(&raw.name)
        };
        let name_clean = clean_name(&name);

        Ingredient {
            source_id: raw.id,
            category: categorize(&name_clean, &raw.aisle),
            dietary_tags: dietary_tags(&name_clean),
            allergens: detect_allergens(&name_clean),
            nutrition: Self::nutrition(raw),
            verified: raw.id != 0,
            name,
            name_clean,
        }
    }
}

impl Normalizer for IngredientNormalizer {
    type Output = Ingredient;

    fn normalize(&self, raw: &Value) -> Ingredient {
        Self::from_raw(&from_value::<RawIngredient>(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_categorize_by_name() {
        assert_eq!(categorize("kale", ""), IngredientCategory::Produce);
        assert_eq!(categorize("chicken breast", ""), IngredientCategory::Proteins);
        assert_eq!(categorize("chicken broth", ""), IngredientCategory::Proteins);
        assert_eq!(categorize("greek yogurt", ""), IngredientCategory::Dairy);
        assert_eq!(categorize("brown rice", ""), IngredientCategory::Grains);
        assert_eq!(categorize("red bell pepper", ""), IngredientCategory::Produce);
        assert_eq!(categorize("black pepper", ""), IngredientCategory::Pantry);
        assert_eq!(categorize("orange juice", ""), IngredientCategory::Beverages);
        assert_eq!(categorize("xanthan gum", ""), IngredientCategory::Other);
    }

    #[test]
    fn test_categorize_compound_names() {
        assert_eq!(categorize("eggplant", ""), IngredientCategory::Produce);
        assert_eq!(categorize("butternut squash", ""), IngredientCategory::Produce);
        assert_eq!(categorize("green beans", ""), IngredientCategory::Produce);
        assert_eq!(categorize("peanut butter", ""), IngredientCategory::Pantry);
        assert_eq!(categorize("peanuts", ""), IngredientCategory::Pantry);
        assert_eq!(categorize("black peppercorns", ""), IngredientCategory::Pantry);
        assert_eq!(categorize("cornstarch", ""), IngredientCategory::Pantry);
        assert_eq!(categorize("graham crackers", ""), IngredientCategory::Grains);
        assert_eq!(categorize("coconut milk", ""), IngredientCategory::Pantry);
        assert_eq!(categorize("sweet corn", ""), IngredientCategory::Produce);
        assert_eq!(categorize("hard boiled egg", ""), IngredientCategory::Proteins);
    }

    #[test]
    fn test_categorize_falls_back_to_aisle() {
        assert_eq!(categorize("xanthan gum", "Baking"), IngredientCategory::Pantry);
        assert_eq!(categorize("rambutan", "Produce"), IngredientCategory::Produce);
        assert_eq!(
            categorize("quark", "Milk, Eggs, Other Dairy"),
            IngredientCategory::Dairy
        );
        assert_eq!(categorize("mystery", "?"), IngredientCategory::Other);
    }

    #[test]
    fn test_dietary_tags() {
        let kale = dietary_tags("kale");
        assert!(kale.contains("vegetarian") && kale.contains("vegan"));

        let cheese = dietary_tags("cheddar cheese");
        assert!(cheese.contains("vegetarian"));
        assert!(!cheese.contains("vegan"));

        assert!(dietary_tags("chicken breast").is_empty());
    }

    #[test]
    fn test_normalize_scales_to_100g() {
        let ingredient = IngredientNormalizer.normalize(&json!({
            "id": 9003,
            "name": "Apple",
            "amount": 200,
            "unit": "g",
            "aisle": "Produce",
            "nutrition": {"nutrients": [
                {"name": "Calories", "amount": 104, "unit": "kcal"},
                {"name": "Sugar", "amount": 20.8, "unit": "g"},
                {"name": "Sodium", "amount": "2mg"}
            ]}
        }));
        assert_eq!(ingredient.name, "Apple");
        assert_eq!(ingredient.name_clean, "apple");
        assert_eq!(ingredient.nutrition.calories, 52.0);
        assert!((ingredient.nutrition.sugar - 10.4).abs() < 1e-9);
        assert_eq!(ingredient.nutrition.sodium, 1.0);
        assert_eq!(ingredient.nutrition.protein, 0.0);
        assert_eq!(ingredient.category, IngredientCategory::Produce);
        assert!(ingredient.verified);
    }

    #[test]
    fn test_normalize_non_mass_unit_keeps_amounts() {
        let ingredient = IngredientNormalizer.normalize(&json!({
            "name": "egg",
            "amount": 1,
            "unit": "large",
            "nutrition": {"nutrients": [{"name": "Protein", "amount": 6.3}]}
        }));
        assert_eq!(ingredient.nutrition.protein, 6.3);
        assert!(ingredient.allergens.contains("egg"));
        assert!(!ingredient.verified);
    }

    #[test]
    fn test_normalize_garbage_yields_other() {
        let ingredient = IngredientNormalizer.normalize(&json!("not an ingredient"));
        assert_eq!(ingredient.category, IngredientCategory::Other);
        assert_eq!(ingredient.name, "");
        assert_eq!(ingredient.nutrition, Nutrition100g::default());
    }
}
