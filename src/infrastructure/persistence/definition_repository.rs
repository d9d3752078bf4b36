use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{CharacterDefinitionRepositoryPort, RepositoryError};
use crate::domain::entities::CharacterDefinition;
use crate::domain::value_objects::CharacterId;

pub struct SqliteCharacterDefinitionRepository {
    pool: SqlitePool,
}

impl SqliteCharacterDefinitionRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS character_definitions (
                character_id TEXT PRIMARY KEY,
                definition_json TEXT NOT NULL,
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
impl CharacterDefinitionRepositoryPort for SqliteCharacterDefinitionRepository {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterDefinition>, RepositoryError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT definition_json FROM character_definitions WHERE character_id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        row.map(|(json,)| serde_json::from_str(&json))
            .transpose()
            .map_err(RepositoryError::from)
    }

    async fn save(&self, definition: &CharacterDefinition) -> Result<(), RepositoryError> {
        let json = serde_json::to_string(definition)?;

        sqlx::query(
            r#"
            INSERT INTO character_definitions (character_id, definition_json, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(character_id) DO UPDATE SET
                definition_json = excluded.definition_json,
                updated_at = excluded.updated_at
        "#,
        )
        .bind(definition.id.to_string())
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCharacterDefinitionRepository {
    definitions: RwLock<HashMap<CharacterId, CharacterDefinition>>,
}

impl InMemoryCharacterDefinitionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterDefinitionRepositoryPort for InMemoryCharacterDefinitionRepository {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterDefinition>, RepositoryError> {
        Ok(self.definitions.read().await.get(&id).cloned())
    }

    async fn save(&self, definition: &CharacterDefinition) -> Result<(), RepositoryError> {
        self.definitions
            .write()
            .await
            .insert(definition.id, definition.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{BaseScoreMethod, TraitSelections};
    use crate::domain::value_objects::SkillKind;
    use crate::infrastructure::persistence::memory_pool;
    use crate::test_fixtures::{elf_wizard_sage, halfling_rogue_criminal};

    #[tokio::test]
    async fn test_sqlite_save_and_update() {
        let repository = SqliteCharacterDefinitionRepository::new(memory_pool().await)
            .await
            .unwrap();
        let definition = halfling_rogue_criminal().with_traits(TraitSelections {
            base_scores: BaseScoreMethod::Rolled { seed: 42 },
            skill_choices: vec![SkillKind::Stealth, SkillKind::Acrobatics],
            ..TraitSelections::default()
        });

        repository.save(&definition).await.unwrap();
        assert_eq!(repository.get(definition.id).await.unwrap(), Some(definition.clone()));

        let updated = definition.clone().with_level(3);
        repository.save(&updated).await.unwrap();
        assert_eq!(repository.get(definition.id).await.unwrap().unwrap().level, 3);
    }

    #[tokio::test]
    async fn test_missing_definition() {
        let repository = SqliteCharacterDefinitionRepository::new(memory_pool().await)
            .await
            .unwrap();
        assert!(repository.get(CharacterId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_repository() {
        let repository = InMemoryCharacterDefinitionRepository::new();
        let definition = elf_wizard_sage();
        repository.save(&definition).await.unwrap();
        assert_eq!(repository.get(definition.id).await.unwrap(), Some(definition));
    }
}
