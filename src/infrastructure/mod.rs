//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: SQLite and in-memory stores for definitions and sheets
//! - HTTP: REST API routes
//! - WebSocket: sheet run progress stream
//! - Ollama: LLM integration for feature descriptions
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod ollama;
pub mod persistence;
pub mod state;
pub mod websocket;
