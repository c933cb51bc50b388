use crate::api::models::AppState;
use crate::api::search::handlers::{ingredient_search_handler, name_search_handler};
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(ingredient_search_handler))
        .route("/search-name", get(name_search_handler))
}
