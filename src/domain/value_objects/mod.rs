//! Value objects - Immutable objects defined by their attributes

mod ability;
mod dice;
mod ids;
mod settings;
mod skill_kind;

pub use ability::{ability_modifier, Ability, AbilityBounds, AbilityScores};
pub use dice::{roll_4d6_drop_lowest, seeded_rng, Die};
pub use ids::*;
pub use settings::AppSettings;
pub use skill_kind::SkillKind;
