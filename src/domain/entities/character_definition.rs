//! Character definition - the player-authored input to sheet generation

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{CharacterId, SkillKind};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;

/// How the six base ability values are produced before racial bonuses
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BaseScoreMethod {
    /// 15, 14, 13, 12, 10, 8 placed down the class's ability priority
    #[default]
    StandardArray,
    /// Player-assigned values in STR, DEX, CON, INT, WIS, CHA order
    Assigned { values: [i32; 6] },
    /// 4d6 drop lowest, six times, from a fixed seed
    Rolled { seed: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HitPointMethod {
    #[default]
    Average,
    Rolled { seed: u64 },
}

/// Raw trait selections made in the character editor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraitSelections {
    #[serde(default)]
    pub base_scores: BaseScoreMethod,
    #[serde(default)]
    pub skill_choices: Vec<SkillKind>,
    #[serde(default)]
    pub language_choices: Vec<String>,
    #[serde(default)]
    pub hit_points: HitPointMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Armor,
    Shield,
    Weapon,
}

/// An item the character has equipped, referencing the equipment tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_id: String,
    pub kind: EquipmentKind,
}

impl EquippedItem {
    pub fn armor(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            kind: EquipmentKind::Armor,
        }
    }

    pub fn shield(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            kind: EquipmentKind::Shield,
        }
    }

    pub fn weapon(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            kind: EquipmentKind::Weapon,
        }
    }
}

/// Immutable input to one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDefinition {
    pub id: CharacterId,
    pub name: String,
    pub race_id: Option<String>,
    pub class_id: Option<String>,
    pub background_id: Option<String>,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub traits: TraitSelections,
    #[serde(default)]
    pub equipment: Vec<EquippedItem>,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub backstory: String,
}

fn default_level() -> u8 {
    MIN_LEVEL
}

/// Race, class and background ids of a definition that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSelections<'a> {
    pub race_id: &'a str,
    pub class_id: &'a str,
    pub background_id: &'a str,
}

impl CharacterDefinition {
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            race_id: None,
            class_id: None,
            background_id: None,
            level: MIN_LEVEL,
            traits: TraitSelections::default(),
            equipment: Vec::new(),
            motivation: String::new(),
            backstory: String::new(),
        }
    }

    pub fn with_race(mut self, race_id: impl Into<String>) -> Self {
        self.race_id = Some(race_id.into());
        self
    }

    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_background(mut self, background_id: impl Into<String>) -> Self {
        self.background_id = Some(background_id.into());
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_equipment(mut self, item: EquippedItem) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn with_traits(mut self, traits: TraitSelections) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_motivation(mut self, motivation: impl Into<String>) -> Self {
        self.motivation = motivation.into();
        self
    }

    /// Check the fields every stage needs. Returns the name of the first
    /// missing or invalid field.
    pub fn core_selections(&self) -> Result<CoreSelections<'_>, &'static str> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let race_id = present(&self.race_id).ok_or("race")?;
        let class_id = present(&self.class_id).ok_or("class")?;
        let background_id = present(&self.background_id).ok_or("background")?;
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err("level");
        }
        Ok(CoreSelections {
            race_id,
            class_id,
            background_id,
        })
    }

    pub fn weapons(&self) -> impl Iterator<Item = &EquippedItem> {
        self.equipment
            .iter()
            .filter(|item| item.kind == EquipmentKind::Weapon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CharacterDefinition {
        CharacterDefinition::new(CharacterId::new(), "Aelar")
            .with_race("elf")
            .with_class("wizard")
            .with_background("sage")
    }

    #[test]
    fn test_core_selections_present() {
        let definition = complete();
        let core = definition.core_selections().unwrap();
        assert_eq!(core.race_id, "elf");
        assert_eq!(core.class_id, "wizard");
        assert_eq!(core.background_id, "sage");
    }

    #[test]
    fn test_missing_fields_are_named_in_order() {
        let mut definition = complete();
        definition.background_id = None;
        assert_eq!(definition.core_selections(), Err("background"));

        definition.class_id = Some("   ".to_string());
        assert_eq!(definition.core_selections(), Err("class"));

        definition.race_id = None;
        assert_eq!(definition.core_selections(), Err("race"));
    }

    #[test]
    fn test_level_out_of_range() {
        assert_eq!(complete().with_level(0).core_selections(), Err("level"));
        assert_eq!(complete().with_level(21).core_selections(), Err("level"));
        assert!(complete().with_level(20).core_selections().is_ok());
    }

    #[test]
    fn test_definition_json_defaults() {
        let json = format!(
            r#"{{"id":"{}","name":"Bare","race_id":"elf","class_id":"wizard","background_id":"sage"}}"#,
            CharacterId::new()
        );
        let definition: CharacterDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(definition.level, 1);
        assert_eq!(definition.traits.base_scores, BaseScoreMethod::StandardArray);
        assert!(definition.equipment.is_empty());
    }
}
