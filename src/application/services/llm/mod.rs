//! Prompt construction for the narrative service

mod prompt_builder;

pub use prompt_builder::{build_system_prompt, build_user_message, FeaturePromptContext};
