use crate::api::models::*;
use crate::storage::Recipe;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use tracing::info;

/// Detail page for a single recipe. All fields are HTML-escaped.
#[derive(Template)]
#[template(path = "recipe.html")]
pub struct RecipePage<'a> {
    pub recipe: &'a Recipe,
}

pub async fn recipe_page_handler(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> Result<Html<String>, PageError> {
    let Some(id) = query.parsed_id() else {
        info!(id = ?query.id, "Recipe id missing or not numeric");
        return Err(PageError::NotFound);
    };

    let recipe = state
        .with_store(move |store| store.get(id))
        .await?
        .ok_or(PageError::NotFound)?;

    info!(id, name = %recipe.name, "Rendering recipe page");

    let page = RecipePage { recipe: &recipe }
        .render()
        .map_err(|e| PageError::Internal(format!("Template render failed: {}", e)))?;

    Ok(Html(page))
}
