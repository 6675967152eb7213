use mockito::{Matcher, ServerGuard};
use std::sync::Arc;
use wellness_recipes::config::QuotaConfig;
use wellness_recipes::{
    MealPlanRequest, MemoryCache, MemoryQuotaTracker, RecipeApiClient, RecipeApiConfig,
    RecipeApiError, RecipeSearch, TimeFrame,
};

fn test_config(server: &ServerGuard, daily_max: u32) -> RecipeApiConfig {
    RecipeApiConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.url(),
        quota: QuotaConfig {
            daily_max,
            requests_per_minute: 0,
        },
        ..Default::default()
    }
}

fn client(server: &ServerGuard, daily_max: u32) -> RecipeApiClient {
    RecipeApiClient::new(test_config(server, daily_max)).unwrap()
}

const VEGETARIAN_PAGE: &str = r#"{
    "results": [
        {
            "id": 715415,
            "title": "Red Lentil Soup with Chicken Turnips",
            "vegetarian": false,
            "vegan": false,
            "diets": ["lacto ovo vegetarian"],
            "dishTypes": ["soup"],
            "readyInMinutes": 55,
            "extendedIngredients": [{"id": 16069, "name": "red lentils", "amount": 1, "unit": "cup", "original": "1 cup red lentils"}]
        },
        {
            "id": 716406,
            "title": "Asparagus and Pea Soup",
            "vegetarian": true,
            "vegan": true,
            "glutenFree": true,
            "diets": ["gluten free", "dairy free", "vegan"],
            "dishTypes": ["lunch", "soup"],
            "readyInMinutes": 20
        }
    ],
    "offset": 0,
    "number": 2,
    "totalResults": 2
}"#;

#[test]
fn test_vegetarian_search_returns_vegetarian_recipes() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("diet".into(), "vegetarian".into()),
            Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            Matcher::UrlEncoded("addRecipeInformation".into(), "true".into()),
            Matcher::UrlEncoded("fillIngredients".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VEGETARIAN_PAGE)
        .create();

    let client = client(&server, 150);
    let recipes = client
        .search_normalized_recipes(&RecipeSearch::new().diet("vegetarian"))
        .unwrap();

    assert_eq!(recipes.len(), 2);
    for recipe in &recipes {
        assert!(
            recipe.dietary_tags.contains("vegetarian"),
            "{} missing vegetarian tag",
            recipe.title
        );
    }
    assert!(recipes[1].dietary_tags.contains("vegan"));
    assert_eq!(recipes[0].ingredients[0].quantity, 240.0);
    mock.assert();
}

#[test]
fn test_vegetarian_search_drops_recipes_without_the_diet() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("diet".into(), "vegetarian".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"results": [
                {"id": 1, "title": "Fish Tacos", "vegetarian": false, "diets": ["pescatarian"]},
                {"id": 2, "title": "Veggie Chili", "vegetarian": true, "diets": []}
            ]}"#,
        )
        .create();

    let client = client(&server, 10);
    let recipes = client
        .search_normalized_recipes(&RecipeSearch::new().diet("vegetarian"))
        .unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Veggie Chili");
    assert!(recipes[0].dietary_tags.contains("vegetarian"));
}

#[test]
fn test_quota_exhaustion_sends_no_request() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/food/ingredients/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .expect(2)
        .create();

    let client = client(&server, 2);
    client.search_ingredients("kale", 1).unwrap();
    client.search_ingredients("rice", 1).unwrap();

    match client.search_ingredients("beans", 1) {
        Err(RecipeApiError::QuotaExceeded { used, limit }) => {
            assert_eq!(used, 2);
            assert_eq!(limit, 2);
        }
        other => panic!("expected QuotaExceeded, got {:?}", other),
    }
    assert_eq!(client.remaining_requests(), 0);
    mock.assert();
}

#[test]
fn test_cached_response_skips_http_and_quota() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/recipes/716429/information")
        .match_query(Matcher::UrlEncoded(
            "includeNutrition".into(),
            "true".into(),
        ))
        .with_status(200)
        .with_body(r#"{"id": 716429, "title": "Pasta with Garlic"}"#)
        .expect(1)
        .create();

    let client = client(&server, 1);
    let first = client.get_recipe_information(716429, true).unwrap();
    let second = client.get_recipe_information(716429, true).unwrap();

    assert_eq!(first, second);
    assert_eq!(client.quota_status().requests_today, 1);
    mock.assert();
}

#[test]
fn test_shared_cache_between_clients() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/recipes/1/nutritionWidget.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"nutrients": [{"name": "Calories", "amount": 300}]}"#)
        .expect(1)
        .create();

    let cache = Arc::new(MemoryCache::new());
    let tracker = Arc::new(MemoryQuotaTracker::new());
    let first = RecipeApiClient::with_stores(
        test_config(&server, 10),
        cache.clone(),
        tracker.clone(),
    )
    .unwrap();
    let second =
        RecipeApiClient::with_stores(test_config(&server, 10), cache, tracker).unwrap();

    first.get_recipe_nutrition(1).unwrap();
    second.get_recipe_nutrition(1).unwrap();
    mock.assert();
}

#[test]
fn test_server_error_is_request_error_and_not_cached() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/food/ingredients/9003/information")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(r#"{"status": "failure"}"#)
        .expect(2)
        .create();

    let client = client(&server, 10);
    for _ in 0..2 {
        match client.get_ingredient_information(9003, "g", 100.0) {
            Err(RecipeApiError::ApiRequest { endpoint, reason }) => {
                assert_eq!(endpoint, "ingredient_information");
                assert!(reason.contains("500"));
            }
            other => panic!("expected ApiRequest, got {:?}", other),
        }
    }
    mock.assert();
}

#[test]
fn test_unparsable_body_is_response_error() {
    let mut server = mockito::Server::new();
    let _m = server
        .mock("GET", "/mealplanner/generate")
        .match_query(Matcher::UrlEncoded("timeFrame".into(), "day".into()))
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>Service temporarily unavailable</html>")
        .create();

    let client = client(&server, 10);
    let result = client.generate_meal_plan(&MealPlanRequest::new(TimeFrame::Day));

    match result {
        Err(err @ RecipeApiError::ApiResponse { .. }) => assert!(err.is_fallback_signal()),
        other => panic!("expected ApiResponse, got {:?}", other),
    }
}

#[test]
fn test_meal_plan_params_are_sent() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/mealplanner/generate")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("timeFrame".into(), "week".into()),
            Matcher::UrlEncoded("targetCalories".into(), "1800".into()),
            Matcher::UrlEncoded("diet".into(), "vegan".into()),
            Matcher::UrlEncoded("exclude".into(), "peanut,shellfish".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"week": {"monday": {"meals": []}}}"#)
        .create();

    let client = client(&server, 10);
    let plan = client
        .generate_meal_plan(
            &MealPlanRequest::new(TimeFrame::Week)
                .target_calories(1800)
                .diet("vegan")
                .exclude("peanut")
                .exclude("shellfish"),
        )
        .unwrap();

    assert!(plan["week"]["monday"]["meals"].is_array());
    mock.assert();
}

#[test]
fn test_unreachable_host_is_request_error() {
    let config = RecipeApiConfig {
        api_key: Some("test-key".to_string()),
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: 2,
        quota: QuotaConfig {
            daily_max: 10,
            requests_per_minute: 0,
        },
        ..Default::default()
    };
    let client = RecipeApiClient::new(config).unwrap();

    match client.get_recipe_nutrition(42) {
        Err(RecipeApiError::ApiRequest { reason, .. }) => {
            assert!(!reason.contains("test-key"));
        }
        other => panic!("expected ApiRequest, got {:?}", other),
    }
}
