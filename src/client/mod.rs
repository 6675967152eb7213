//! Blocking client for the upstream recipe API.
//!
//! Every call goes cache first, then quota, then HTTP. Successful payloads
//! are cached with the endpoint's TTL. Failures are returned as-is; there
//! are no internal retries.

mod request;

pub use request::{Endpoint, MealPlanRequest, RecipeSearch, TimeFrame, MAX_RESULTS};

use crate::cache::{cache_key, CacheStore, MemoryCache};
use crate::config::RecipeApiConfig;
use crate::error::RecipeApiError;
use crate::model::{Ingredient, Recipe};
use crate::normalizers::{
    from_value, IngredientNormalizer, Normalizer, RawResultPage, RecipeNormalizer,
};
use crate::quota::{MemoryQuotaTracker, QuotaGuard, QuotaState, QuotaTracker};
use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::Arc;

pub struct RecipeApiClient {
    http: Client,
    config: RecipeApiConfig,
    api_key: String,
    cache: Arc<dyn CacheStore>,
    quota: QuotaGuard,
}

impl RecipeApiClient {
    /// Create a client with in-process cache and quota tracking
    pub fn new(config: RecipeApiConfig) -> Result<Self, RecipeApiError> {
        Self::with_stores(
            config,
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryQuotaTracker::new()),
        )
    }

    /// Create a client from `config.toml` and `WELLNESS__*` environment variables
    pub fn from_env() -> Result<Self, RecipeApiError> {
        Self::new(RecipeApiConfig::load()?)
    }

    /// Create a client sharing the given cache and quota tracker
    pub fn with_stores(
        config: RecipeApiConfig,
        cache: Arc<dyn CacheStore>,
        tracker: Arc<dyn QuotaTracker>,
    ) -> Result<Self, RecipeApiError> {
        let api_key = config
            .resolve_api_key()
            .ok_or(RecipeApiError::MissingApiKey)?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("wellness-recipes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RecipeApiError::ApiRequest {
                endpoint: "client".to_string(),
                reason: e.to_string(),
            })?;

        let quota = QuotaGuard::new(&config.quota, tracker);

        Ok(RecipeApiClient {
            http,
            config,
            api_key,
            cache,
            quota,
        })
    }

    pub fn config(&self) -> &RecipeApiConfig {
        &self.config
    }

    pub fn quota_status(&self) -> QuotaState {
        self.quota.status()
    }

    /// Requests left before the daily ceiling
    pub fn remaining_requests(&self) -> u32 {
        self.quota.remaining()
    }

    fn fetch(
        &self,
        endpoint: Endpoint,
        id: Option<u64>,
        params: Vec<(String, String)>,
    ) -> Result<Value, RecipeApiError> {
        let mut key_params = params.clone();
        if let Some(id) = id {
            key_params.push(("id".to_string(), id.to_string()));
        }
        let key = cache_key(endpoint.name(), &key_params);

        if let Some(payload) = self.cache.get(&key) {
            debug!("Cache hit for {}", endpoint);
            return Ok(payload);
        }
        debug!("Cache miss for {}", endpoint);

        self.quota.acquire()?;

        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.path(&self.config.endpoints, id)
        );
        debug!("GET {} {:?}", url, params);

        let request_error = |reason: String| RecipeApiError::ApiRequest {
            endpoint: endpoint.name().to_string(),
            reason,
        };

        let response = self
            .http
            .get(&url)
            .query(&params)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            // the URL carries the API key
            .map_err(|e| request_error(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(request_error(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .map_err(|e| request_error(e.without_url().to_string()))?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|source| RecipeApiError::ApiResponse {
                endpoint: endpoint.name().to_string(),
                source,
            })?;

        self.cache
            .set(&key, payload.clone(), endpoint.ttl(&self.config.cache_ttl));
        Ok(payload)
    }

    /// Search recipes; results come with full information and nutrition inline
    pub fn search_recipes(&self, search: &RecipeSearch) -> Result<Value, RecipeApiError> {
        self.fetch(Endpoint::RecipeSearch, None, search.to_params())
    }

    pub fn get_recipe_information(
        &self,
        id: u64,
        include_nutrition: bool,
    ) -> Result<Value, RecipeApiError> {
        self.fetch(
            Endpoint::RecipeInformation,
            Some(id),
            vec![(
                "includeNutrition".to_string(),
                include_nutrition.to_string(),
            )],
        )
    }

    pub fn get_recipe_nutrition(&self, id: u64) -> Result<Value, RecipeApiError> {
        self.fetch(Endpoint::RecipeNutrition, Some(id), Vec::new())
    }

    pub fn search_ingredients(&self, query: &str, number: u32) -> Result<Value, RecipeApiError> {
        self.fetch(
            Endpoint::IngredientSearch,
            None,
            vec![
                ("query".to_string(), query.trim().to_string()),
                (
                    "number".to_string(),
                    number.clamp(1, MAX_RESULTS).to_string(),
                ),
            ],
        )
    }

    /// Ingredient detail with nutrients scaled to `amount` of `unit`
    pub fn get_ingredient_information(
        &self,
        id: u64,
        unit: &str,
        amount: f64,
    ) -> Result<Value, RecipeApiError> {
        self.fetch(
            Endpoint::IngredientInformation,
            Some(id),
            vec![
                ("amount".to_string(), amount.to_string()),
                ("unit".to_string(), unit.to_string()),
            ],
        )
    }

    pub fn generate_meal_plan(&self, request: &MealPlanRequest) -> Result<Value, RecipeApiError> {
        self.fetch(Endpoint::MealPlan, None, request.to_params())
    }

    /// Search and normalize every result.
    ///
    /// With a diet set, recipes whose normalized tags do not carry that diet
    /// are dropped even if upstream returned them.
    pub fn search_normalized_recipes(
        &self,
        search: &RecipeSearch,
    ) -> Result<Vec<Recipe>, RecipeApiError> {
        let page: RawResultPage = from_value(&self.search_recipes(search)?);
        Ok(page
            .results
            .iter()
            .map(|raw| RecipeNormalizer.normalize(raw))
            .filter(|recipe| {
                let keep = search.matches_diet(&recipe.dietary_tags);
                if !keep {
                    debug!("Dropping '{}': diet not in {:?}", recipe.title, recipe.dietary_tags);
                }
                keep
            })
            .collect())
    }

    /// Fetch one recipe with nutrition and normalize it
    pub fn fetch_recipe(&self, id: u64) -> Result<Recipe, RecipeApiError> {
        let raw = self.get_recipe_information(id, true)?;
        Ok(RecipeNormalizer.normalize(&raw))
    }

    /// Fetch one ingredient on a 100 g basis and normalize it
    pub fn fetch_ingredient(&self, id: u64) -> Result<Ingredient, RecipeApiError> {
        let raw = self.get_ingredient_information(id, "g", 100.0)?;
        Ok(IngredientNormalizer.normalize(&raw))
    }
}
