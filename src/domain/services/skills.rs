//! Skill proficiencies, skill modifiers and saving throws

use std::collections::BTreeSet;

use crate::domain::entities::{
    CharacterDefinition, CoreSelections, SavingThrow, Skill, SkillsSection,
};
use crate::domain::rules::{RuleTables, RulesError};
use crate::domain::value_objects::{Ability, AbilityScores, SkillKind};

/// Level-derived bonus added to everything the character is proficient in
pub fn proficiency_bonus(level: u8) -> i32 {
    2 + (i32::from(level.max(1)) - 1) / 4
}

pub struct SkillsGenerator<'a> {
    tables: &'a RuleTables,
}

impl<'a> SkillsGenerator<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    pub fn generate(
        &self,
        definition: &CharacterDefinition,
        core: &CoreSelections<'_>,
        abilities: &AbilityScores,
    ) -> Result<SkillsSection, RulesError> {
        let race = self.tables.race(core.race_id)?;
        let class = self.tables.class(core.class_id)?;
        let background = self.tables.background(core.background_id)?;
        let bonus = proficiency_bonus(definition.level);

        let mut proficient: BTreeSet<SkillKind> = background.skills.iter().copied().collect();
        proficient.extend(race.skills.iter().copied());

        let choices = &definition.traits.skill_choices;
        if choices.is_empty() {
            // No explicit picks: take the first class options not already granted
            let picks: Vec<SkillKind> = class
                .skill_options
                .iter()
                .filter(|skill| !proficient.contains(*skill))
                .take(class.skill_count)
                .copied()
                .collect();
            proficient.extend(picks);
        } else {
            for skill in choices.iter().take(class.skill_count) {
                if !class.skill_options.contains(skill) {
                    return Err(RulesError::SkillNotOffered {
                        class: class.name.clone(),
                        skill: *skill,
                    });
                }
                proficient.insert(*skill);
            }
        }

        let skills: Vec<Skill> = SkillKind::ALL
            .into_iter()
            .map(|name| {
                let ability = name.ability();
                let is_proficient = proficient.contains(&name);
                Skill {
                    name,
                    ability,
                    proficient: is_proficient,
                    modifier: abilities.modifier(ability) + if is_proficient { bonus } else { 0 },
                }
            })
            .collect();

        let saving_throws = Ability::ALL
            .into_iter()
            .map(|ability| {
                let is_proficient = class.saving_throws.contains(&ability);
                SavingThrow {
                    ability,
                    proficient: is_proficient,
                    modifier: abilities.modifier(ability) + if is_proficient { bonus } else { 0 },
                }
            })
            .collect();

        let perception = skills
            .iter()
            .find(|s| s.name == SkillKind::Perception)
            .map_or(0, |s| s.modifier);

        Ok(SkillsSection {
            proficiency_bonus: bonus,
            skills,
            saving_throws,
            passive_perception: 10 + perception,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TraitSelections;
    use crate::test_fixtures::{core, elf_wizard_sage, srd};

    fn wizard_scores() -> AbilityScores {
        AbilityScores::from_values([8, 15, 14, 16, 12, 10])
    }

    #[test]
    fn test_proficiency_bonus_progression() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn test_sage_wizard_defaults() {
        let tables = srd();
        let definition = elf_wizard_sage();
        let section = SkillsGenerator::new(&tables)
            .generate(&definition, &core(&definition), &wizard_scores())
            .unwrap();

        assert_eq!(section.skills.len(), 18);
        let arcana = section.skill(SkillKind::Arcana).unwrap();
        assert!(arcana.proficient);
        assert_eq!(arcana.modifier, 5);
        assert!(section.skill(SkillKind::History).unwrap().proficient);
        // Elf Keen Senses
        assert!(section.skill(SkillKind::Perception).unwrap().proficient);
        // Arcana and History are taken, so the class picks the next two
        assert!(section.skill(SkillKind::Insight).unwrap().proficient);
        assert!(section.skill(SkillKind::Investigation).unwrap().proficient);
        assert!(!section.skill(SkillKind::Medicine).unwrap().proficient);

        let athletics = section.skill(SkillKind::Athletics).unwrap();
        assert!(!athletics.proficient);
        assert_eq!(athletics.modifier, -1);
        assert_eq!(section.passive_perception, 13);
    }

    #[test]
    fn test_saving_throws_follow_class() {
        let tables = srd();
        let definition = elf_wizard_sage();
        let section = SkillsGenerator::new(&tables)
            .generate(&definition, &core(&definition), &wizard_scores())
            .unwrap();

        let int_save = section
            .saving_throws
            .iter()
            .find(|s| s.ability == Ability::Intelligence)
            .unwrap();
        assert!(int_save.proficient);
        assert_eq!(int_save.modifier, 5);
        let str_save = section
            .saving_throws
            .iter()
            .find(|s| s.ability == Ability::Strength)
            .unwrap();
        assert!(!str_save.proficient);
        assert_eq!(str_save.modifier, -1);
    }

    #[test]
    fn test_explicit_choices() {
        let tables = srd();
        let definition = elf_wizard_sage().with_traits(TraitSelections {
            skill_choices: vec![SkillKind::Medicine, SkillKind::Religion],
            ..TraitSelections::default()
        });
        let section = SkillsGenerator::new(&tables)
            .generate(&definition, &core(&definition), &wizard_scores())
            .unwrap();
        assert!(section.skill(SkillKind::Medicine).unwrap().proficient);
        assert!(section.skill(SkillKind::Religion).unwrap().proficient);
        assert!(!section.skill(SkillKind::Insight).unwrap().proficient);
    }

    #[test]
    fn test_choice_outside_class_list_fails() {
        let tables = srd();
        let definition = elf_wizard_sage().with_traits(TraitSelections {
            skill_choices: vec![SkillKind::Stealth],
            ..TraitSelections::default()
        });
        let err = SkillsGenerator::new(&tables)
            .generate(&definition, &core(&definition), &wizard_scores())
            .unwrap_err();
        assert_eq!(
            err,
            RulesError::SkillNotOffered {
                class: "Wizard".to_string(),
                skill: SkillKind::Stealth
            }
        );
    }
}
