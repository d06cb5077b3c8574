mod json;
mod sqlite;

use std::path::Path;

use anyhow::Result;

use crate::domain::Period;

pub use json::*;
pub use sqlite::*;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Load/save contract for the period history.
///
/// `load` returns an empty history on first run. `save` writes the whole
/// history, replacing whatever was stored before. For any history `h`,
/// `load` after `save(h)` must return `h`.
#[allow(async_fn_in_trait)]
pub trait LogbookStore {
    async fn load(&self) -> Result<Vec<Period>>;
    async fn save(&self, periods: &[Period]) -> Result<()>;
}

/// Store selected at runtime.
pub enum Store {
    Json(JsonFileStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn json(path: impl AsRef<Path>) -> Self {
        Store::Json(JsonFileStore::new(path))
    }

    /// Open (creating if needed) an SQLite logbook and run migrations.
    pub async fn sqlite(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Store::Sqlite(SqliteStore::open(path).await?))
    }
}

impl LogbookStore for Store {
    async fn load(&self) -> Result<Vec<Period>> {
        match self {
            Store::Json(store) => store.load().await,
            Store::Sqlite(store) => store.load().await,
        }
    }

    async fn save(&self, periods: &[Period]) -> Result<()> {
        match self {
            Store::Json(store) => store.save(periods).await,
            Store::Sqlite(store) => store.save(periods).await,
        }
    }
}
