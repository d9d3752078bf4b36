//! Ability score calculation

use crate::domain::entities::{BaseScoreMethod, CharacterDefinition, CoreSelections};
use crate::domain::rules::{check_priority, RuleTables, RulesError};
use crate::domain::value_objects::{
    roll_4d6_drop_lowest, seeded_rng, Ability, AbilityBounds, AbilityScores,
};

pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

/// Widest range accepted for a player-assigned base value
const ASSIGNED_RANGE: std::ops::RangeInclusive<i32> = 1..=30;

/// Derives the six ability scores from the base array, race and class.
///
/// Pure: identical definitions and tables always give identical scores.
pub struct AbilityScoreCalculator<'a> {
    tables: &'a RuleTables,
    bounds: AbilityBounds,
}

impl<'a> AbilityScoreCalculator<'a> {
    pub fn new(tables: &'a RuleTables, bounds: AbilityBounds) -> Self {
        Self { tables, bounds }
    }

    pub fn calculate(
        &self,
        definition: &CharacterDefinition,
        core: &CoreSelections<'_>,
    ) -> Result<AbilityScores, RulesError> {
        let race = self.tables.race(core.race_id)?;
        let class = self.tables.class(core.class_id)?;
        check_priority(core.class_id, &class.ability_priority)?;

        let mut values = match &definition.traits.base_scores {
            BaseScoreMethod::StandardArray => place_by_priority(STANDARD_ARRAY, &class.ability_priority),
            BaseScoreMethod::Assigned { values } => {
                for ability in Ability::ALL {
                    let value = values[ability.index()];
                    if !ASSIGNED_RANGE.contains(&value) {
                        return Err(RulesError::InvalidBaseScore { ability, value });
                    }
                }
                *values
            }
            BaseScoreMethod::Rolled { seed } => {
                let mut rng = seeded_rng(*seed);
                let mut rolls = [0i32; 6];
                for roll in rolls.iter_mut() {
                    *roll = roll_4d6_drop_lowest(&mut rng);
                }
                rolls.sort_unstable_by(|a, b| b.cmp(a));
                place_by_priority(rolls, &class.ability_priority)
            }
        };

        for bonus in &race.ability_bonuses {
            values[bonus.ability.index()] += bonus.bonus;
        }
        for value in values.iter_mut() {
            *value = self.bounds.clamp(*value);
        }

        Ok(AbilityScores::from_values(values))
    }
}

/// Put the highest value on the class's most important ability, and so on
fn place_by_priority(sorted_high_to_low: [i32; 6], priority: &[Ability]) -> [i32; 6] {
    let mut values = [0i32; 6];
    for (ability, value) in priority.iter().zip(sorted_high_to_low) {
        values[ability.index()] = value;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TraitSelections;
    use crate::domain::value_objects::ability_modifier;
    use crate::test_fixtures::{core, elf_wizard_sage, srd};

    #[test]
    fn test_elf_wizard_standard_array() {
        let tables = srd();
        let definition = elf_wizard_sage();
        let scores = AbilityScoreCalculator::new(&tables, AbilityBounds::default())
            .calculate(&definition, &core(&definition))
            .unwrap();

        assert_eq!(scores.intelligence.value, 16);
        assert_eq!(scores.constitution.value, 14);
        assert_eq!(scores.dexterity.value, 15);
        assert_eq!(scores.wisdom.value, 12);
        assert_eq!(scores.charisma.value, 10);
        assert_eq!(scores.strength.value, 8);
        assert_eq!(scores.intelligence.modifier, 3);
        assert_eq!(scores.strength.modifier, -1);
    }

    #[test]
    fn test_assigned_scores_are_clamped_and_modifiers_exact() {
        let tables = srd();
        let definition = elf_wizard_sage().with_traits(TraitSelections {
            base_scores: BaseScoreMethod::Assigned {
                values: [3, 19, 10, 20, 9, 11],
            },
            ..TraitSelections::default()
        });
        let scores = AbilityScoreCalculator::new(&tables, AbilityBounds::default())
            .calculate(&definition, &core(&definition))
            .unwrap();

        // DEX 19 + 2 and INT 20 + 1 both clamp to 20
        assert_eq!(scores.dexterity.value, 20);
        assert_eq!(scores.intelligence.value, 20);
        for (_, score) in scores.iter() {
            assert!(AbilityBounds::default().contains(score.value));
            assert_eq!(score.modifier, ability_modifier(score.value));
        }
        assert_eq!(scores.wisdom.modifier, -1);
    }

    #[test]
    fn test_assigned_out_of_range_is_rejected() {
        let tables = srd();
        let definition = elf_wizard_sage().with_traits(TraitSelections {
            base_scores: BaseScoreMethod::Assigned {
                values: [10, 10, 10, 10, 0, 10],
            },
            ..TraitSelections::default()
        });
        let err = AbilityScoreCalculator::new(&tables, AbilityBounds::default())
            .calculate(&definition, &core(&definition))
            .unwrap_err();
        assert_eq!(
            err,
            RulesError::InvalidBaseScore {
                ability: Ability::Wisdom,
                value: 0
            }
        );
    }

    #[test]
    fn test_rolled_scores_are_deterministic() {
        let tables = srd();
        let definition = elf_wizard_sage().with_traits(TraitSelections {
            base_scores: BaseScoreMethod::Rolled { seed: 7 },
            ..TraitSelections::default()
        });
        let calculator = AbilityScoreCalculator::new(&tables, AbilityBounds::default());
        let first = calculator.calculate(&definition, &core(&definition)).unwrap();
        let second = calculator.calculate(&definition, &core(&definition)).unwrap();
        assert_eq!(first, second);
        // Highest roll lands on the wizard's primary ability
        let strength_without_bonus = first.strength.value;
        assert!(first.intelligence.value - 1 >= strength_without_bonus);
    }

    #[test]
    fn test_unknown_race_fails() {
        let tables = srd();
        let definition = elf_wizard_sage().with_race("Tiefling");
        let err = AbilityScoreCalculator::new(&tables, AbilityBounds::default())
            .calculate(&definition, &core(&definition))
            .unwrap_err();
        assert_eq!(err, RulesError::UnknownRace("Tiefling".to_string()));
    }
}
