//! Character sheet - the fully computed output of the sheet pipeline

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Ability, AbilityScores, CharacterId, Die, SkillKind};

use super::CharacterDefinition;

/// Hit dice available to the character: `count` dice of type `die`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDicePool {
    pub die: Die,
    pub count: u8,
}

/// Combat numbers that do not depend on weapons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseCombatStats {
    pub armor_class: i32,
    pub initiative_modifier: i32,
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    pub hit_dice: HitDicePool,
    pub speed: u32,
}

/// One attack line on the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub ability: Ability,
    pub proficient: bool,
    pub attack_bonus: i32,
    /// Damage expression with its type, such as `1d8+3 slashing`
    pub damage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub armor_class: i32,
    pub initiative_modifier: i32,
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    pub hit_dice: HitDicePool,
    pub speed: u32,
    pub attacks: Vec<Attack>,
}

impl CombatStats {
    pub fn new(base: BaseCombatStats, attacks: Vec<Attack>) -> Self {
        Self {
            armor_class: base.armor_class,
            initiative_modifier: base.initiative_modifier,
            max_hit_points: base.max_hit_points,
            current_hit_points: base.current_hit_points.min(base.max_hit_points),
            hit_dice: base.hit_dice,
            speed: base.speed,
            attacks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: SkillKind,
    pub ability: Ability,
    pub proficient: bool,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingThrow {
    pub ability: Ability,
    pub proficient: bool,
    pub modifier: i32,
}

/// Output of the skills stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsSection {
    pub proficiency_bonus: i32,
    pub skills: Vec<Skill>,
    pub saving_throws: Vec<SavingThrow>,
    pub passive_perception: i32,
}

impl SkillsSection {
    pub fn skill(&self, name: SkillKind) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureSource {
    Race,
    Class,
    Background,
}

/// Whether a feature description came from the narrative service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
    pub source: FeatureSource,
    pub generation_status: GenerationStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Proficiencies {
    pub armor: Vec<String>,
    pub weapons: Vec<String>,
    pub tools: Vec<String>,
}

impl Proficiencies {
    pub fn has_weapon(&self, name: &str) -> bool {
        self.weapons.iter().any(|w| w.eq_ignore_ascii_case(name))
    }
}

pub const MAX_DEATH_SAVES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeathSaves {
    successes: u8,
    failures: u8,
}

impl DeathSaves {
    /// Counters outside 0..=3 are rejected
    pub fn new(successes: u8, failures: u8) -> Option<Self> {
        (successes <= MAX_DEATH_SAVES && failures <= MAX_DEATH_SAVES)
            .then_some(Self { successes, failures })
    }

    pub fn successes(&self) -> u8 {
        self.successes
    }

    pub fn failures(&self) -> u8 {
        self.failures
    }
}

/// Outputs of all seven stages, gathered before assembly
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSections {
    pub abilities: AbilityScores,
    pub base_combat: BaseCombatStats,
    pub skills: SkillsSection,
    pub features: Vec<Feature>,
    pub languages: Vec<String>,
    pub proficiencies: Proficiencies,
    pub attacks: Vec<Attack>,
}

/// The aggregate root returned to callers and cached in the sheet store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub character_id: CharacterId,
    pub name: String,
    pub race: String,
    pub class: String,
    pub background: String,
    pub level: u8,
    pub rules_version: String,
    pub abilities: AbilityScores,
    pub combat: CombatStats,
    pub skills: SkillsSection,
    pub death_saves: DeathSaves,
    pub features_and_traits: Vec<Feature>,
    pub proficiencies: Proficiencies,
    pub languages: Vec<String>,
}

/// Display names for the definition's race, class and background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHeader {
    pub race: String,
    pub class: String,
    pub background: String,
    pub rules_version: String,
}

impl CharacterSheet {
    pub fn assemble(
        definition: &CharacterDefinition,
        header: SheetHeader,
        sections: SheetSections,
    ) -> Self {
        Self {
            character_id: definition.id,
            name: definition.name.clone(),
            race: header.race,
            class: header.class,
            background: header.background,
            level: definition.level,
            rules_version: header.rules_version,
            abilities: sections.abilities,
            combat: CombatStats::new(sections.base_combat, sections.attacks),
            skills: sections.skills,
            death_saves: DeathSaves::default(),
            features_and_traits: sections.features,
            proficiencies: sections.proficiencies,
            languages: sections.languages,
        }
    }

    /// Features whose description had to use the static fallback text
    pub fn fallback_features(&self) -> impl Iterator<Item = &Feature> {
        self.features_and_traits
            .iter()
            .filter(|f| f.generation_status == GenerationStatus::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_saves_bounds() {
        assert!(DeathSaves::new(3, 3).is_some());
        assert!(DeathSaves::new(4, 0).is_none());
        assert!(DeathSaves::new(0, 4).is_none());
        let fresh = DeathSaves::default();
        assert_eq!((fresh.successes(), fresh.failures()), (0, 0));
    }

    #[test]
    fn test_combat_stats_cap_current_hp() {
        let base = BaseCombatStats {
            armor_class: 12,
            initiative_modifier: 2,
            max_hit_points: 8,
            current_hit_points: 11,
            hit_dice: HitDicePool { die: Die::D8, count: 1 },
            speed: 30,
        };
        let combat = CombatStats::new(base, Vec::new());
        assert_eq!(combat.current_hit_points, 8);
        assert!(combat.attacks.is_empty());
    }

    #[test]
    fn test_weapon_proficiency_lookup_ignores_case() {
        let proficiencies = Proficiencies {
            weapons: vec!["Simple weapons".to_string(), "Longsword".to_string()],
            ..Proficiencies::default()
        };
        assert!(proficiencies.has_weapon("simple weapons"));
        assert!(proficiencies.has_weapon("LONGSWORD"));
        assert!(!proficiencies.has_weapon("Rapier"));
    }
}
