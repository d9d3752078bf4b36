//! Base combat statistics: armor class, initiative, hit points, hit dice

use crate::domain::entities::{
    BaseCombatStats, CharacterDefinition, CoreSelections, EquipmentKind, HitDicePool,
    HitPointMethod,
};
use crate::domain::rules::{ArmorCategory, ArmorEntry, RuleTables, RulesError};
use crate::domain::value_objects::{seeded_rng, Ability, AbilityScores, Die};

/// Armor class with no body armor
const UNARMORED_BASE: i32 = 10;

pub struct CombatStatsCalculator<'a> {
    tables: &'a RuleTables,
}

impl<'a> CombatStatsCalculator<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    pub fn calculate(
        &self,
        definition: &CharacterDefinition,
        core: &CoreSelections<'_>,
        abilities: &AbilityScores,
    ) -> Result<BaseCombatStats, RulesError> {
        let race = self.tables.race(core.race_id)?;
        let class = self.tables.class(core.class_id)?;

        let dex = abilities.modifier(Ability::Dexterity);
        let con = abilities.modifier(Ability::Constitution);
        let armor_class = self.armor_class(definition, dex)?;
        let max_hit_points =
            max_hit_points(class.hit_die, definition.level, con, definition.traits.hit_points);

        Ok(BaseCombatStats {
            armor_class,
            initiative_modifier: dex,
            max_hit_points,
            current_hit_points: max_hit_points,
            hit_dice: HitDicePool {
                die: class.hit_die,
                count: definition.level,
            },
            speed: race.speed,
        })
    }

    fn armor_class(&self, definition: &CharacterDefinition, dex: i32) -> Result<i32, RulesError> {
        let mut body: Option<&ArmorEntry> = None;
        let mut shield: Option<&ArmorEntry> = None;

        for item in &definition.equipment {
            let slot = match item.kind {
                EquipmentKind::Weapon => continue,
                EquipmentKind::Armor => &mut body,
                EquipmentKind::Shield => &mut shield,
            };
            let entry = self.tables.armor(&item.item_id)?;
            let is_shield = entry.category == ArmorCategory::Shield;
            if is_shield != (item.kind == EquipmentKind::Shield) {
                return Err(RulesError::ConflictingEquipment(format!(
                    "{} is equipped in the wrong slot",
                    entry.name
                )));
            }
            if let Some(existing) = slot.replace(entry) {
                return Err(RulesError::ConflictingEquipment(format!(
                    "{} and {} cannot be worn together",
                    existing.name, entry.name
                )));
            }
        }

        let base = match body {
            None => UNARMORED_BASE + dex,
            Some(armor) => match armor.category {
                ArmorCategory::Light => armor.armor_class + dex,
                ArmorCategory::Medium => {
                    armor.armor_class + armor.dex_cap.map_or(dex, |cap| dex.min(cap))
                }
                ArmorCategory::Heavy => armor.armor_class,
                ArmorCategory::Shield => {
                    return Err(RulesError::ConflictingEquipment(format!(
                        "{} is not body armor",
                        armor.name
                    )))
                }
            },
        };
        Ok(base + shield.map_or(0, |s| s.armor_class))
    }
}

/// Hit points across all levels; each level grants at least one point
fn max_hit_points(die: Die, level: u8, con: i32, method: HitPointMethod) -> i32 {
    match method {
        HitPointMethod::Average => (die.average() + con).max(1) * i32::from(level),
        HitPointMethod::Rolled { seed } => {
            let mut rng = seeded_rng(seed);
            (0..level).map(|_| (die.roll(&mut rng) + con).max(1)).sum()
        }
    }
}
