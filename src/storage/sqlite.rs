use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::info;

/// Stored recipe row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
}

/// Recipe fields supplied on insert; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewRecipe<'a> {
    pub name: &'a str,
    pub ingredients: &'a str,
    pub instructions: &'a str,
}

/// Rows inserted into an empty table at startup
pub const SAMPLE_RECIPES: [NewRecipe<'static>; 2] = [
    NewRecipe {
        name: "Chicken Fried Rice",
        ingredients: "chicken, rice, egg, peas",
        instructions: "Cook rice and chicken, mix with peas and egg.",
    },
    NewRecipe {
        name: "Grilled Chicken",
        ingredients: "chicken, olive oil, spices",
        instructions: "Grill chicken with oil and spices.",
    },
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    Poisoned,

    #[error("store task failed: {0}")]
    Task(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    ingredients TEXT,
    instructions TEXT
)";

const SELECT_COLUMNS: &str = "SELECT id, name, ingredients, instructions FROM recipes";

/// Recipe table backed by a single SQLite connection.
///
/// All requests share the one connection; the mutex serializes access.
pub struct RecipeStore {
    conn: Mutex<Connection>,
}

impl RecipeStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: &Path) -> StoreResult<Self> {
        info!("Opening recipe database at {:?}", path);
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        register_fold_case(&conn)?;
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert the sample recipes if the table is empty.
    /// Returns the number of rows inserted.
    pub fn seed_if_empty(&self) -> StoreResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let count: i64 = tx.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        if count > 0 {
            info!(existing = count, "Recipe table already populated, skipping seed");
            return Ok(0);
        }

        for recipe in &SAMPLE_RECIPES {
            insert_row(&tx, recipe)?;
        }
        tx.commit()?;

        info!(inserted = SAMPLE_RECIPES.len(), "Seeded sample recipes");
        Ok(SAMPLE_RECIPES.len())
    }

    #[cfg(test)]
    pub fn insert(&self, recipe: &NewRecipe<'_>) -> StoreResult<i64> {
        let conn = self.lock()?;
        insert_row(&conn, recipe)
    }

    pub fn count(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Every row in natural (rowid) order
    pub fn all(&self) -> StoreResult<Vec<Recipe>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(SELECT_COLUMNS)?;
        let rows = stmt.query_map([], map_recipe)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Case-insensitive substring match on the recipe name
    pub fn search_by_name(&self, fragment: &str) -> StoreResult<Vec<Recipe>> {
        let pattern = format!("%{}%", escape_like_pattern(&fragment.to_lowercase()));

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE fold_case(name) LIKE ?1 ESCAPE '\\'"
        ))?;
        let rows = stmt.query_map(params![pattern], map_recipe)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Recipe>> {
        let conn = self.lock()?;
        let recipe = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                map_recipe,
            )
            .optional()?;
        Ok(recipe)
    }
}

/// SQLite's LOWER() and LIKE only fold ASCII; `fold_case` lower-cases
/// with full Unicode rules so both sides of the LIKE agree.
fn register_fold_case(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

fn insert_row(conn: &Connection, recipe: &NewRecipe<'_>) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO recipes (name, ingredients, instructions) VALUES (?1, ?2, ?3)",
        params![recipe.name, recipe.ingredients, recipe.instructions],
    )?;
    Ok(conn.last_insert_rowid())
}

fn map_recipe(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        ingredients: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        instructions: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Escape LIKE wildcards so user input only ever matches literally
fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store() -> RecipeStore {
        let store = RecipeStore::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        store
    }

    fn names(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn seeds_two_rows_into_empty_table() {
        let store = RecipeStore::open_in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.seed_if_empty().unwrap(), 2);

        let all = store.all().unwrap();
        assert_eq!(names(&all), vec!["Chicken Fried Rice", "Grilled Chicken"]);
        assert_eq!(all[0].ingredients, "chicken, rice, egg, peas");
    }

    #[test]
    fn seeding_survives_restart_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("recipes.db");

        {
            let store = RecipeStore::open(&path).unwrap();
            assert_eq!(store.seed_if_empty().unwrap(), 2);
        }

        let store = RecipeStore::open(&path).unwrap();
        assert_eq!(store.seed_if_empty().unwrap(), 0);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn seed_skipped_when_table_has_other_rows() {
        let store = RecipeStore::open_in_memory().unwrap();
        store
            .insert(&NewRecipe {
                name: "Toast",
                ingredients: "bread",
                instructions: "Toast it.",
            })
            .unwrap();

        assert_eq!(store.seed_if_empty().unwrap(), 0);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn ids_are_assigned_sequentially() {
        let store = seeded_store();
        let ids: Vec<i64> = store.all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn name_search_is_case_insensitive_substring() {
        let store = seeded_store();

        let lower = store.search_by_name("chicken").unwrap();
        let upper = store.search_by_name("CHICKEN").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(names(&lower), vec!["Chicken Fried Rice", "Grilled Chicken"]);

        assert_eq!(names(&store.search_by_name("fried").unwrap()), vec!["Chicken Fried Rice"]);
        assert!(store.search_by_name("pasta").unwrap().is_empty());
    }

    #[test]
    fn name_search_folds_non_ascii_case() {
        let store = RecipeStore::open_in_memory().unwrap();
        store
            .insert(&NewRecipe {
                name: "CRÈME BRÛLÉE",
                ingredients: "cream, sugar, eggs",
                instructions: "Bake, then torch the sugar.",
            })
            .unwrap();

        for fragment in ["crème", "CRÈME", "brûlée", "Crème Brûlée"] {
            assert_eq!(
                names(&store.search_by_name(fragment).unwrap()),
                vec!["CRÈME BRÛLÉE"],
                "{fragment}"
            );
        }
    }

    #[test]
    fn empty_name_matches_everything() {
        let store = seeded_store();
        assert_eq!(store.search_by_name("").unwrap().len(), 2);
    }

    #[test]
    fn like_wildcards_in_input_match_literally() {
        let store = seeded_store();
        assert!(store.search_by_name("%").unwrap().is_empty());
        assert!(store.search_by_name("chicken_fried").unwrap().is_empty());

        store
            .insert(&NewRecipe {
                name: "100% Rye",
                ingredients: "rye",
                instructions: "Bake.",
            })
            .unwrap();
        assert_eq!(names(&store.search_by_name("0%").unwrap()), vec!["100% Rye"]);
    }

    #[test]
    fn get_by_id() {
        let store = seeded_store();

        let recipe = store.get(2).unwrap().unwrap();
        assert_eq!(recipe.name, "Grilled Chicken");
        assert_eq!(recipe.instructions, "Grill chicken with oil and spices.");

        assert!(store.get(99).unwrap().is_none());
    }

    #[test]
    fn null_columns_read_as_empty_strings() {
        let store = RecipeStore::open_in_memory().unwrap();
        store
            .lock()
            .unwrap()
            .execute("INSERT INTO recipes (name) VALUES ('Mystery')", [])
            .unwrap();

        let recipe = store.get(1).unwrap().unwrap();
        assert_eq!(recipe.name, "Mystery");
        assert_eq!(recipe.ingredients, "");
        assert_eq!(recipe.instructions, "");
    }
}
