use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{CharacterSheetStorePort, RepositoryError};
use crate::domain::entities::CharacterSheet;
use crate::domain::value_objects::CharacterId;

pub struct SqliteCharacterSheetStore {
    pool: SqlitePool,
}

impl SqliteCharacterSheetStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS character_sheets (
                character_id TEXT PRIMARY KEY,
                sheet_json TEXT NOT NULL,
                rules_version TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CharacterSheetStorePort for SqliteCharacterSheetStore {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>, RepositoryError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT sheet_json FROM character_sheets WHERE character_id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(|(json,)| serde_json::from_str(&json))
            .transpose()
            .map_err(RepositoryError::from)
    }

    async fn set(&self, id: CharacterId, sheet: &CharacterSheet) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(sheet)?;

        // Single statement, so readers see the old row or the new one
        sqlx::query(
            r#"
            INSERT INTO character_sheets (character_id, sheet_json, rules_version, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(character_id) DO UPDATE SET
                sheet_json = excluded.sheet_json,
                rules_version = excluded.rules_version,
                updated_at = excluded.updated_at
        "#,
        )
        .bind(id.to_string())
        .bind(json)
        .bind(&sheet.rules_version)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCharacterSheetStore {
    sheets: RwLock<HashMap<CharacterId, CharacterSheet>>,
}

impl InMemoryCharacterSheetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterSheetStorePort for InMemoryCharacterSheetStore {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>, RepositoryError> {
        Ok(self.sheets.read().await.get(&id).cloned())
    }

    async fn set(&self, id: CharacterId, sheet: &CharacterSheet) -> Result<(), RepositoryError> {
        self.sheets.write().await.insert(id, sheet.clone());
        Ok(())
    }
}
