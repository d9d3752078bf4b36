//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::inbound::CharacterSheetUseCase;
use crate::application::ports::outbound::{
    CharacterDefinitionRepositoryPort, CharacterSheetStorePort, LlmPort,
};
use crate::application::services::SheetPipelineService;
use crate::domain::rules::RuleTables;
use crate::domain::value_objects::AppSettings;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ollama::OllamaClient;
use crate::infrastructure::persistence::{
    self, InMemoryCharacterDefinitionRepository, InMemoryCharacterSheetStore,
    SqliteCharacterDefinitionRepository, SqliteCharacterSheetStore,
};

/// Shared application state
pub struct AppState {
    pub tables: Arc<RuleTables>,
    /// Definitions written by the character editor
    pub definitions: Arc<dyn CharacterDefinitionRepositoryPort>,
    pub sheets: Arc<dyn CharacterSheetUseCase>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let settings = AppSettings::from_env();

        let tables = match &config.rule_tables_path {
            Some(path) => RuleTables::from_json_file(path)?,
            None => RuleTables::srd(),
        };
        tracing::info!("Rule tables loaded: {}", tables.version);

        let (definitions, store): (
            Arc<dyn CharacterDefinitionRepositoryPort>,
            Arc<dyn CharacterSheetStorePort>,
        ) = if config.uses_memory_storage() {
            tracing::warn!("Using in-memory storage, sheets will not survive a restart");
            (
                Arc::new(InMemoryCharacterDefinitionRepository::new()),
                Arc::new(InMemoryCharacterSheetStore::new()),
            )
        } else {
            let pool = persistence::connect(&config.database_url).await?;
            let definitions = SqliteCharacterDefinitionRepository::new(pool.clone())
                .await
                .context("Failed to prepare character_definitions table")?;
            let store = SqliteCharacterSheetStore::new(pool)
                .await
                .context("Failed to prepare character_sheets table")?;
            (Arc::new(definitions), Arc::new(store))
        };

        let llm = Arc::new(OllamaClient::new(&config.ollama_base_url, &config.ollama_model));

        Ok(Self::from_parts(settings, tables, definitions, store, llm))
    }

    pub fn from_parts(
        settings: AppSettings,
        tables: RuleTables,
        definitions: Arc<dyn CharacterDefinitionRepositoryPort>,
        store: Arc<dyn CharacterSheetStorePort>,
        llm: Arc<dyn LlmPort>,
    ) -> Self {
        let tables = Arc::new(tables);
        let sheets = SheetPipelineService::new(
            definitions.clone(),
            store,
            tables.clone(),
            llm,
            settings,
        );

        Self {
            tables,
            definitions,
            sheets: Arc::new(sheets),
        }
    }
}
