//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use async_trait::async_trait;

use crate::domain::entities::{CharacterDefinition, CharacterSheet};
use crate::domain::value_objects::CharacterId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::Serialization(e.to_string())
    }
}

/// Source of the player-authored definitions. Owned by the character editor;
/// the pipeline only reads from it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterDefinitionRepositoryPort: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterDefinition>, RepositoryError>;
    async fn save(&self, definition: &CharacterDefinition) -> Result<(), RepositoryError>;
}

/// Cache of generated sheets, keyed by character.
///
/// `set` must replace the stored sheet in one step: a concurrent reader sees
/// either the previous sheet or the new one, never a mix.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterSheetStorePort: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>, RepositoryError>;
    async fn set(&self, id: CharacterId, sheet: &CharacterSheet) -> Result<(), RepositoryError>;
}
