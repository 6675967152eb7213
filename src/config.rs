use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration for the recipe API layer
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeApiConfig {
    /// API key for the upstream service (can also be set via SPOONACULAR_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the upstream API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path templates for each endpoint
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Daily ceiling and request spacing
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Per-endpoint cache lifetimes
    #[serde(default)]
    pub cache_ttl: CacheTtlConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Path templates, `{id}` is replaced with the resource id
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    #[serde(default = "default_recipe_search")]
    pub recipe_search: String,
    #[serde(default = "default_recipe_information")]
    pub recipe_information: String,
    #[serde(default = "default_recipe_nutrition")]
    pub recipe_nutrition: String,
    #[serde(default = "default_ingredient_search")]
    pub ingredient_search: String,
    #[serde(default = "default_ingredient_information")]
    pub ingredient_information: String,
    #[serde(default = "default_meal_plan")]
    pub meal_plan: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            recipe_search: default_recipe_search(),
            recipe_information: default_recipe_information(),
            recipe_nutrition: default_recipe_nutrition(),
            ingredient_search: default_ingredient_search(),
            ingredient_information: default_ingredient_information(),
            meal_plan: default_meal_plan(),
        }
    }
}

/// Configuration for the dual-window rate limit
#[derive(Debug, Deserialize, Clone)]
pub struct QuotaConfig {
    /// Maximum upstream requests per rolling day
    #[serde(default = "default_daily_max")]
    pub daily_max: u32,
    /// Sets the minimum spacing between requests (60 / requests_per_minute seconds)
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_max: default_daily_max(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl QuotaConfig {
    /// Minimum spacing between two upstream requests
    pub fn min_interval(&self) -> Duration {
        if self.requests_per_minute == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(60.0 / self.requests_per_minute as f64)
    }
}

/// Cache lifetimes in seconds, per endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct CacheTtlConfig {
    #[serde(default = "default_search_ttl")]
    pub recipe_search: u64,
    #[serde(default = "default_detail_ttl")]
    pub recipe_information: u64,
    #[serde(default = "default_detail_ttl")]
    pub recipe_nutrition: u64,
    #[serde(default = "default_ingredient_search_ttl")]
    pub ingredient_search: u64,
    #[serde(default = "default_ingredient_information_ttl")]
    pub ingredient_information: u64,
    #[serde(default = "default_search_ttl")]
    pub meal_plan: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            recipe_search: default_search_ttl(),
            recipe_information: default_detail_ttl(),
            recipe_nutrition: default_detail_ttl(),
            ingredient_search: default_ingredient_search_ttl(),
            ingredient_information: default_ingredient_information_ttl(),
            meal_plan: default_search_ttl(),
        }
    }
}

impl Default for RecipeApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            endpoints: EndpointsConfig::default(),
            quota: QuotaConfig::default(),
            cache_ttl: CacheTtlConfig::default(),
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_recipe_search() -> String {
    "/recipes/complexSearch".to_string()
}

fn default_recipe_information() -> String {
    "/recipes/{id}/information".to_string()
}

fn default_recipe_nutrition() -> String {
    "/recipes/{id}/nutritionWidget.json".to_string()
}

fn default_ingredient_search() -> String {
    "/food/ingredients/search".to_string()
}

fn default_ingredient_information() -> String {
    "/food/ingredients/{id}/information".to_string()
}

fn default_meal_plan() -> String {
    "/mealplanner/generate".to_string()
}

fn default_daily_max() -> u32 {
    150
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_search_ttl() -> u64 {
    60 * 60
}

fn default_detail_ttl() -> u64 {
    24 * 60 * 60
}

fn default_ingredient_search_ttl() -> u64 {
    6 * 60 * 60
}

fn default_ingredient_information_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_timeout() -> u64 {
    30
}

impl RecipeApiConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with WELLNESS__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: WELLNESS__QUOTA__DAILY_MAX
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// API key from configuration, falling back to SPOONACULAR_API_KEY
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// See [`RecipeApiConfig::load`] for the precedence rules.
pub fn load_config() -> Result<RecipeApiConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: WELLNESS__CACHE_TTL__RECIPE_SEARCH
        .add_source(
            Environment::with_prefix("WELLNESS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
