pub mod models;
pub mod recipe;
pub mod search;

// Re-exports
pub use models::*;

use axum::{response::Html, routing::get, Router};

/// Search UI served at `/`
pub const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// All routes, bound to the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .merge(search::routes())
        .merge(recipe::routes())
        .with_state(state)
}
