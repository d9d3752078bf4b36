//! Static rule tables for races, classes, backgrounds and equipment
//!
//! Tables are read-only during a pipeline run. Every lookup goes through an
//! accessor that turns a missing id into a [`RulesError`], so stages never
//! index into the maps directly.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Ability, Die, SkillKind};

use super::RulesError;

/// A race/class/background feature as it appears in the tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub name: String,
    /// Static rules summary, also used as fallback description text
    pub summary: String,
    /// Character level at which the feature is gained
    #[serde(default = "first_level")]
    pub level: u8,
}

fn first_level() -> u8 {
    1
}

impl FeatureEntry {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            level: 1,
        }
    }

    pub fn at_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBonus {
    pub ability: Ability,
    pub bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEntry {
    pub name: String,
    pub ability_bonuses: Vec<AbilityBonus>,
    pub speed: u32,
    pub languages: Vec<String>,
    #[serde(default)]
    pub extra_language_choices: u8,
    /// Skill proficiencies granted by racial traits
    #[serde(default)]
    pub skills: Vec<SkillKind>,
    #[serde(default)]
    pub weapon_proficiencies: Vec<String>,
    #[serde(default)]
    pub traits: Vec<FeatureEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub hit_die: Die,
    /// Abilities from most to least important, used to place base arrays
    pub ability_priority: Vec<Ability>,
    pub saving_throws: Vec<Ability>,
    pub skill_options: Vec<SkillKind>,
    pub skill_count: usize,
    #[serde(default)]
    pub armor_proficiencies: Vec<String>,
    #[serde(default)]
    pub weapon_proficiencies: Vec<String>,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    #[serde(default)]
    pub features: Vec<FeatureEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundEntry {
    pub name: String,
    pub skills: Vec<SkillKind>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub language_choices: u8,
    #[serde(default)]
    pub tool_proficiencies: Vec<String>,
    pub feature: FeatureEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shield,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorEntry {
    pub name: String,
    pub category: ArmorCategory,
    /// Base AC for body armor, flat bonus for shields
    pub armor_class: i32,
    /// Maximum Dexterity modifier that applies; `None` means uncapped
    #[serde(default)]
    pub dex_cap: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponCategory {
    Simple,
    Martial,
}

impl WeaponCategory {
    /// Name of the proficiency that covers the whole category
    pub fn proficiency_name(&self) -> &'static str {
        match self {
            WeaponCategory::Simple => "Simple weapons",
            WeaponCategory::Martial => "Martial weapons",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponRange {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponEntry {
    pub name: String,
    pub category: WeaponCategory,
    pub range: WeaponRange,
    #[serde(default)]
    pub finesse: bool,
    pub damage_dice: u8,
    pub damage_die: Die,
    pub damage_type: String,
}

/// The full, versioned rule data set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTables {
    pub version: String,
    pub races: BTreeMap<String, RaceEntry>,
    pub classes: BTreeMap<String, ClassEntry>,
    pub backgrounds: BTreeMap<String, BackgroundEntry>,
    pub armor: BTreeMap<String, ArmorEntry>,
    pub weapons: BTreeMap<String, WeaponEntry>,
    /// Languages offered, in order, for unfilled language choices
    pub language_pool: Vec<String>,
}

fn key(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}

impl RuleTables {
    /// Load a table file and check it before handing it to the pipeline
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let tables: RuleTables = serde_json::from_str(&raw)?;
        tables.validate()?;
        tracing::info!(
            "Loaded rule tables {} from {}",
            tables.version,
            path.display()
        );
        Ok(tables)
    }

    pub fn race(&self, id: &str) -> Result<&RaceEntry, RulesError> {
        self.races
            .get(&key(id))
            .ok_or_else(|| RulesError::UnknownRace(id.to_string()))
    }

    pub fn class(&self, id: &str) -> Result<&ClassEntry, RulesError> {
        self.classes
            .get(&key(id))
            .ok_or_else(|| RulesError::UnknownClass(id.to_string()))
    }

    pub fn background(&self, id: &str) -> Result<&BackgroundEntry, RulesError> {
        self.backgrounds
            .get(&key(id))
            .ok_or_else(|| RulesError::UnknownBackground(id.to_string()))
    }

    pub fn armor(&self, id: &str) -> Result<&ArmorEntry, RulesError> {
        self.armor
            .get(&key(id))
            .ok_or_else(|| RulesError::UnknownArmor(id.to_string()))
    }

    pub fn weapon(&self, id: &str) -> Result<&WeaponEntry, RulesError> {
        self.weapons
            .get(&key(id))
            .ok_or_else(|| RulesError::UnknownWeapon(id.to_string()))
    }

    /// Structural checks that stages rely on
    pub fn validate(&self) -> Result<(), RulesError> {
        for (id, class) in &self.classes {
            check_priority(id, &class.ability_priority)?;
            if class.skill_count > class.skill_options.len() {
                return Err(RulesError::MalformedEntry {
                    table: "classes".to_string(),
                    id: id.clone(),
                    reason: format!(
                        "skill_count {} exceeds {} skill options",
                        class.skill_count,
                        class.skill_options.len()
                    ),
                });
            }
        }
        for (id, armor) in &self.armor {
            if armor.armor_class < 0 {
                return Err(RulesError::MalformedEntry {
                    table: "armor".to_string(),
                    id: id.clone(),
                    reason: "negative armor class".to_string(),
                });
            }
        }
        for (id, weapon) in &self.weapons {
            if weapon.damage_dice == 0 {
                return Err(RulesError::MalformedEntry {
                    table: "weapons".to_string(),
                    id: id.clone(),
                    reason: "weapon deals no damage dice".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A class ability priority must name each of the six abilities exactly once
pub(crate) fn check_priority(class_id: &str, priority: &[Ability]) -> Result<(), RulesError> {
    let distinct: HashSet<Ability> = priority.iter().copied().collect();
    if priority.len() != Ability::ALL.len() || distinct.len() != Ability::ALL.len() {
        return Err(RulesError::MalformedEntry {
            table: "classes".to_string(),
            id: class_id.to_string(),
            reason: "ability_priority must list all six abilities once".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let tables = RuleTables::srd();
        assert_eq!(tables.race("Elf").map(|r| r.name.as_str()), Ok("Elf"));
        assert_eq!(tables.class(" WIZARD ").map(|c| c.hit_die), Ok(Die::D6));
        assert_eq!(
            tables.background("Sage").map(|b| b.language_choices),
            Ok(2)
        );
    }

    #[test]
    fn test_unknown_ids_are_errors() {
        let tables = RuleTables::srd();
        assert_eq!(
            tables.race("Tiefling").err(),
            Some(RulesError::UnknownRace("Tiefling".to_string()))
        );
        assert!(tables.weapon("lightsaber").is_err());
    }

    #[test]
    fn test_builtin_tables_validate() {
        assert!(RuleTables::srd().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_priority() {
        let mut tables = RuleTables::srd();
        if let Some(wizard) = tables.classes.get_mut("wizard") {
            wizard.ability_priority = vec![Ability::Intelligence, Ability::Intelligence];
        }
        assert!(matches!(
            tables.validate(),
            Err(RulesError::MalformedEntry { ref id, .. }) if id == "wizard"
        ));
    }

    #[test]
    fn test_tables_survive_json() {
        let tables = RuleTables::srd();
        let json = serde_json::to_string(&tables).unwrap();
        let parsed: RuleTables = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tables);
    }
}
