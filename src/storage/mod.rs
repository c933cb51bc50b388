pub mod sqlite;

pub use sqlite::{NewRecipe, Recipe, RecipeStore, StoreError, StoreResult};
