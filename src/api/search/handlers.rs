use crate::api::models::*;
use crate::matching;
use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

pub async fn ingredient_search_handler(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> Result<Json<RankedSearchResponse>, AppError> {
    // Validate
    let ingredients = query.validate().map_err(AppError::BadRequest)?;

    info!(ingredients = %ingredients, "Ranking recipes by ingredients");

    // Full scan, ranked in process
    let recipes = state.with_store(|store| store.all()).await?;
    let recipes = matching::rank(recipes, &ingredients);

    info!(found = recipes.len(), "Ingredient search complete");

    Ok(Json(RankedSearchResponse { recipes }))
}

pub async fn name_search_handler(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<NameSearchResponse>, AppError> {
    let name = query.validate().map_err(AppError::BadRequest)?;

    info!(name = %name, "Searching recipes by name");

    let recipes = state
        .with_store(move |store| store.search_by_name(&name))
        .await?;

    info!(found = recipes.len(), "Name search complete");

    Ok(Json(NameSearchResponse { recipes }))
}
