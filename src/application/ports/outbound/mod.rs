//! Outbound ports - Interfaces that the application requires from external systems

mod llm_port;
mod repository_port;

pub use llm_port::{ChatMessage, FinishReason, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole};
pub use repository_port::{
    CharacterDefinitionRepositoryPort, CharacterSheetStorePort, RepositoryError,
};

#[cfg(test)]
pub use llm_port::MockLlmPort;
#[cfg(test)]
pub use repository_port::{MockCharacterDefinitionRepositoryPort, MockCharacterSheetStorePort};
