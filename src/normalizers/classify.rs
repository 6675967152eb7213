//! Keyword tables shared by the recipe and ingredient normalizers.
//!
//! Matching is English-only substring matching on lower-cased text. It is
//! deliberately over-inclusive for allergens: "butternut" flags nuts and
//! dairy, "eggplant" flags egg.

use std::collections::BTreeSet;

pub const ALLERGEN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "nuts",
        &[
            "almond",
            "walnut",
            "pecan",
            "cashew",
            "pistachio",
            "hazelnut",
            "macadamia",
            "brazil nut",
            "pine nut",
            "praline",
            "marzipan",
            "nut",
        ],
    ),
    ("peanuts", &["peanut", "groundnut"]),
    (
        "dairy",
        &[
            "milk",
            "cheese",
            "butter",
            "cream",
            "yogurt",
            "yoghurt",
            "whey",
            "casein",
            "ghee",
            "parmesan",
            "mozzarella",
            "ricotta",
            "custard",
        ],
    ),
    ("egg", &["egg", "mayonnaise", "meringue"]),
    (
        "fish",
        &[
            "fish", "salmon", "tuna", "cod", "anchov", "sardine", "trout", "halibut", "tilapia",
            "mackerel", "haddock",
        ],
    ),
    (
        "shellfish",
        &[
            "shrimp", "prawn", "crab", "lobster", "clam", "mussel", "oyster", "scallop",
            "crayfish",
        ],
    ),
    ("soy", &["soy", "tofu", "edamame", "tempeh", "miso"]),
    (
        "gluten",
        &[
            "wheat",
            "flour",
            "bread",
            "pasta",
            "spaghetti",
            "noodle",
            "barley",
            "rye",
            "couscous",
            "semolina",
            "bulgur",
            "crouton",
            "cracker",
            "seitan",
        ],
    ),
];

pub const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "bacon", "ham", "sausage", "veal", "duck",
    "venison", "steak", "meat", "prosciutto", "salami", "chorizo", "pepperoni", "gelatin",
];

/// Animal products that rule out vegan but not vegetarian
pub const ANIMAL_PRODUCT_KEYWORDS: &[&str] = &["honey"];

/// Keywords registered for one allergen, empty for an unknown name
pub fn allergen_keywords(allergen: &str) -> &'static [&'static str] {
    ALLERGEN_KEYWORDS
        .iter()
        .find(|(name, _)| *name == allergen)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Allergens whose keywords appear anywhere in `text`
pub fn detect_allergens(text: &str) -> BTreeSet<String> {
    let text = text.to_lowercase();
    ALLERGEN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| contains_any(&text, keywords))
        .map(|(allergen, _)| allergen.to_string())
        .collect()
}

/// True when `text` names meat, fish or shellfish
pub fn mentions_meat_or_fish(text: &str) -> bool {
    let text = text.to_lowercase();
    contains_any(&text, MEAT_KEYWORDS)
        || contains_any(&text, allergen_keywords("fish"))
        || contains_any(&text, allergen_keywords("shellfish"))
}

/// True when `text` names dairy, egg or another animal product
pub fn mentions_animal_product(text: &str) -> bool {
    let text = text.to_lowercase();
    contains_any(&text, allergen_keywords("dairy"))
        || contains_any(&text, allergen_keywords("egg"))
        || contains_any(&text, ANIMAL_PRODUCT_KEYWORDS)
}
