//! Rule tables and the errors raised when rule data is missing or malformed

mod srd;
mod tables;

pub use tables::{
    AbilityBonus, ArmorCategory, ArmorEntry, BackgroundEntry, ClassEntry, FeatureEntry,
    RaceEntry, RuleTables, WeaponCategory, WeaponEntry, WeaponRange,
};
pub(crate) use tables::check_priority;

use crate::domain::value_objects::{Ability, SkillKind};

/// Failure of a deterministic stage caused by rule data or the definition
/// referencing something the rule data cannot satisfy
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RulesError {
    #[error("Unknown race: {0}")]
    UnknownRace(String),
    #[error("Unknown class: {0}")]
    UnknownClass(String),
    #[error("Unknown background: {0}")]
    UnknownBackground(String),
    #[error("Unknown armor: {0}")]
    UnknownArmor(String),
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),
    #[error("Malformed {table} entry '{id}': {reason}")]
    MalformedEntry {
        table: String,
        id: String,
        reason: String,
    },
    #[error("Class {class} does not offer skill {skill}")]
    SkillNotOffered { class: String, skill: SkillKind },
    #[error("Invalid base score {value} for {ability}")]
    InvalidBaseScore { ability: Ability, value: i32 },
    #[error("Conflicting equipment: {0}")]
    ConflictingEquipment(String),
}
