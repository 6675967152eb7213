use thiserror::Error;

/// Errors surfaced by the recipe API layer.
///
/// Field-level data problems in upstream payloads never show up here; the
/// normalizers absorb them with defaults.
#[derive(Error, Debug)]
pub enum RecipeApiError {
    /// The daily request ceiling has been reached; no request was sent
    #[error("Daily request quota exhausted ({used}/{limit}), use cached or local data")]
    QuotaExceeded { used: u32, limit: u32 },

    /// Transport failure, timeout or non-2xx status
    #[error("Request to {endpoint} failed: {reason}")]
    ApiRequest { endpoint: String, reason: String },

    /// The response body was not valid JSON
    #[error("Unparsable response from {endpoint}: {source}")]
    ApiResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// An ingredient search came back empty
    #[error("No results for '{query}'")]
    NoResults { query: String },

    /// No API key in configuration or environment
    #[error("No API key configured (set api_key or SPOONACULAR_API_KEY)")]
    MissingApiKey,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl RecipeApiError {
    /// True for failures where the caller should fall back to cached or
    /// local data rather than retry straight away.
    pub fn is_fallback_signal(&self) -> bool {
        matches!(
            self,
            RecipeApiError::QuotaExceeded { .. }
                | RecipeApiError::ApiRequest { .. }
                | RecipeApiError::ApiResponse { .. }
        )
    }
}
