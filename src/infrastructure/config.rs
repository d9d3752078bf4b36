//! Application configuration

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

/// `database_url` value that selects the in-memory stores
pub const MEMORY_DATABASE: &str = "memory";

/// Application configuration loaded from `CHARSHEET_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite connection URL, or `memory` for in-memory stores
    pub database_url: String,

    /// Ollama API base URL (OpenAI-compatible)
    pub ollama_base_url: String,
    /// Model used for feature descriptions
    pub ollama_model: String,

    /// HTTP server port
    pub server_port: u16,

    /// JSON rule tables to load instead of the built-in SRD tables
    #[serde(default)]
    pub rule_tables_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix("CHARSHEET"))
    }

    fn load(environment: Environment) -> Result<Self> {
        Config::builder()
            .set_default("database_url", "sqlite:charsheet.db?mode=rwc")?
            .set_default("ollama_base_url", "http://localhost:11434")?
            .set_default("ollama_model", "llama3.2")?
            .set_default("server_port", 3000)?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("CHARSHEET_SERVER_PORT must be a valid port number")
    }

    pub fn uses_memory_storage(&self) -> bool {
        self.database_url.eq_ignore_ascii_case(MEMORY_DATABASE)
    }
}
