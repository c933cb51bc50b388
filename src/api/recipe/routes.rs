use crate::api::models::AppState;
use crate::api::recipe::handlers::recipe_page_handler;
use axum::{routing::get, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipe", get(recipe_page_handler))
}
