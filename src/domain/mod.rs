//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: CharacterDefinition, CharacterSheet, PipelineRun
//! - Value Objects: ids, abilities, dice, skills, settings
//! - Rules: versioned race/class/background/equipment tables
//! - Domain Services: the deterministic sheet stages

pub mod entities;
pub mod rules;
pub mod services;
pub mod value_objects;
