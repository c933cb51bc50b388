use crate::matching::RankedRecipe;
use crate::storage::{Recipe, RecipeStore, StoreError, StoreResult};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecipeStore>,
}

impl AppState {
    pub fn new(store: RecipeStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Run a store call on the blocking pool
    pub async fn with_store<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&RecipeStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// `GET /search` parameters
#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    pub ingredients: Option<String>,
}

/// `GET /search-name` parameters
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// `GET /recipe` parameters.
/// Kept as text so a malformed id is simply "not found".
#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub id: Option<String>,
}

impl IngredientQuery {
    /// Validate the request
    pub fn validate(self) -> Result<String, String> {
        match self.ingredients {
            Some(list) if !list.trim().is_empty() => Ok(list),
            _ => Err("Ingredients are required".to_string()),
        }
    }
}

impl NameQuery {
    /// Validate the request; an empty name is allowed and matches everything
    pub fn validate(self) -> Result<String, String> {
        self.name.ok_or_else(|| "Name is required".to_string())
    }
}

impl RecipeQuery {
    pub fn parsed_id(&self) -> Option<i64> {
        self.id.as_deref().and_then(|id| id.trim().parse().ok())
    }
}

/// Response from `/search`
#[derive(Debug, Serialize)]
pub struct RankedSearchResponse {
    pub recipes: Vec<RankedRecipe>,
}

/// Response from `/search-name`
#[derive(Debug, Serialize)]
pub struct NameSearchResponse {
    pub recipes: Vec<Recipe>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error type for the JSON endpoints
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Error type for the HTML endpoints, rendered as plain text
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal(String),
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => (StatusCode::NOT_FOUND, "Recipe not found").into_response(),
            PageError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error loading recipe: {}", msg),
                )
                    .into_response()
            }
        }
    }
}
