//! Domain entities - Core business objects with identity

mod character_definition;
mod character_sheet;
mod pipeline_run;

pub use character_definition::{
    BaseScoreMethod, CharacterDefinition, CoreSelections, EquipmentKind, EquippedItem,
    HitPointMethod, TraitSelections,
};
pub use character_sheet::{
    Attack, BaseCombatStats, CharacterSheet, Feature, FeatureSource, GenerationStatus,
    HitDicePool, Proficiencies, SavingThrow, SheetHeader, SheetSections, Skill, SkillsSection,
};
pub use pipeline_run::{PipelineRun, PipelineStage, RunStatus};
