//! Attack entries for equipped weapons

use crate::domain::entities::{Attack, CharacterDefinition, Proficiencies, SkillsSection};
use crate::domain::rules::{RuleTables, RulesError, WeaponEntry, WeaponRange};
use crate::domain::value_objects::{Ability, AbilityScores};

pub struct AttacksGenerator<'a> {
    tables: &'a RuleTables,
}

impl<'a> AttacksGenerator<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    /// One attack per equipped weapon, in equipment order
    pub fn generate(
        &self,
        definition: &CharacterDefinition,
        abilities: &AbilityScores,
        skills: &SkillsSection,
        proficiencies: &Proficiencies,
    ) -> Result<Vec<Attack>, RulesError> {
        definition
            .weapons()
            .map(|item| -> Result<Attack, RulesError> {
                let weapon = self.tables.weapon(&item.item_id)?;
                let ability = attack_ability(weapon, abilities);
                let modifier = abilities.modifier(ability);
                let proficient = proficiencies.has_weapon(&weapon.name)
                    || proficiencies.has_weapon(weapon.category.proficiency_name());
                let attack_bonus = modifier + if proficient { skills.proficiency_bonus } else { 0 };

                Ok(Attack {
                    name: weapon.name.clone(),
                    ability,
                    proficient,
                    attack_bonus,
                    damage: damage_expression(weapon, modifier),
                })
            })
            .collect()
    }
}

fn attack_ability(weapon: &WeaponEntry, abilities: &AbilityScores) -> Ability {
    match weapon.range {
        WeaponRange::Ranged => Ability::Dexterity,
        WeaponRange::Melee if weapon.finesse => {
            if abilities.modifier(Ability::Dexterity) > abilities.modifier(Ability::Strength) {
                Ability::Dexterity
            } else {
                Ability::Strength
            }
        }
        WeaponRange::Melee => Ability::Strength,
    }
}

fn damage_expression(weapon: &WeaponEntry, modifier: i32) -> String {
    let dice = format!("{}{}", weapon.damage_dice, weapon.damage_die);
    let roll = match modifier {
        0 => dice,
        m if m > 0 => format!("{}+{}", dice, m),
        m => format!("{}{}", dice, m),
    };
    format!("{} {}", roll, weapon.damage_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EquippedItem;
    use crate::domain::services::{ProficienciesGenerator, SkillsGenerator};
    use crate::test_fixtures::{core, dwarf_fighter_soldier, elf_wizard_sage, halfling_rogue_criminal, srd};

    fn generate(definition: &CharacterDefinition, values: [i32; 6]) -> Result<Vec<Attack>, RulesError> {
        let tables = srd();
        let abilities = AbilityScores::from_values(values);
        let core = core(definition);
        let skills = SkillsGenerator::new(&tables)
            .generate(definition, &core, &abilities)
            .unwrap();
        let proficiencies = ProficienciesGenerator::new(&tables).generate(&core).unwrap();
        AttacksGenerator::new(&tables).generate(definition, &abilities, &skills, &proficiencies)
    }

    #[test]
    fn test_no_weapons_no_attacks() {
        let attacks = generate(&elf_wizard_sage(), [8, 15, 14, 16, 12, 10]).unwrap();
        assert!(attacks.is_empty());
    }

    #[test]
    fn test_fighter_melee_and_ranged() {
        let attacks = generate(&dwarf_fighter_soldier(), [16, 12, 16, 8, 13, 10]).unwrap();
        assert_eq!(attacks.len(), 2);

        assert_eq!(attacks[0].name, "Warhammer");
        assert_eq!(attacks[0].ability, Ability::Strength);
        assert!(attacks[0].proficient);
        assert_eq!(attacks[0].attack_bonus, 5);
        assert_eq!(attacks[0].damage, "1d8+3 bludgeoning");

        assert_eq!(attacks[1].name, "Light crossbow");
        assert_eq!(attacks[1].ability, Ability::Dexterity);
        assert_eq!(attacks[1].attack_bonus, 3);
        assert_eq!(attacks[1].damage, "1d8+1 piercing");
    }

    #[test]
    fn test_finesse_uses_better_ability() {
        let attacks = generate(&halfling_rogue_criminal(), [8, 17, 14, 13, 12, 11]).unwrap();
        let rapier = &attacks[0];
        assert_eq!(rapier.ability, Ability::Dexterity);
        assert_eq!(rapier.attack_bonus, 5);
        assert_eq!(rapier.damage, "1d8+3 piercing");
    }

    #[test]
    fn test_non_proficient_weapon_gets_no_bonus() {
        let definition = elf_wizard_sage().with_equipment(EquippedItem::weapon("battleaxe"));
        let attacks = generate(&definition, [8, 15, 14, 16, 12, 10]).unwrap();
        assert!(!attacks[0].proficient);
        assert_eq!(attacks[0].attack_bonus, -1);
        assert_eq!(attacks[0].damage, "1d8-1 slashing");
    }

    #[test]
    fn test_unknown_weapon_fails() {
        let definition = elf_wizard_sage().with_equipment(EquippedItem::weapon("vorpal-sword"));
        let err = generate(&definition, [10; 6]).unwrap_err();
        assert_eq!(err, RulesError::UnknownWeapon("vorpal-sword".to_string()));
    }
}
