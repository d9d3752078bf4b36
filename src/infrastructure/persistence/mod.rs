//! Persistence adapters
//!
//! SQLite implementations of the definition repository and the sheet store,
//! plus in-memory variants for tests and `database_url = memory`.

mod definition_repository;
mod sheet_store;

pub use definition_repository::{
    InMemoryCharacterDefinitionRepository, SqliteCharacterDefinitionRepository,
};
pub use sheet_store::{InMemoryCharacterSheetStore, SqliteCharacterSheetStore};

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Open the SQLite pool both adapters share
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    SqlitePool::connect(database_url)
        .await
        .with_context(|| format!("Failed to open database {}", database_url))
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One connection, otherwise every pooled connection gets its own database
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}
