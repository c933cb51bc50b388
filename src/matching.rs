//! Ingredient normalization and match-percentage ranking.

use crate::storage::Recipe;
use serde::Serialize;
use std::collections::HashSet;

/// A recipe annotated with how much of its ingredient list the query covers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_percent: u32,
}

/// Split a comma-separated list into trimmed, lower-cased, non-empty terms
pub fn normalize_ingredients(list: &str) -> Vec<String> {
    list.split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Share of `recipe_ingredients` present in `query`, as a rounded percentage.
///
/// The denominator is the recipe's own ingredient count. An empty recipe
/// list scores 0.
pub fn match_percent(recipe_ingredients: &[String], query: &HashSet<String>) -> u32 {
    let total = recipe_ingredients.len();
    if total == 0 {
        return 0;
    }

    let matched = recipe_ingredients
        .iter()
        .filter(|ingredient| query.contains(ingredient.as_str()))
        .count();

    // round half up: floor((200 * m + t) / 2t)
    ((200 * matched + total) / (2 * total)) as u32
}

/// Score every recipe against the query and order best match first.
/// Equal scores keep their input order.
pub fn rank(recipes: Vec<Recipe>, query: &str) -> Vec<RankedRecipe> {
    let query: HashSet<String> = normalize_ingredients(query).into_iter().collect();

    let mut ranked: Vec<RankedRecipe> = recipes
        .into_iter()
        .map(|recipe| {
            let match_percent = match_percent(&normalize_ingredients(&recipe.ingredients), &query);
            RankedRecipe {
                recipe,
                match_percent,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.match_percent.cmp(&a.match_percent));
    ranked
}
