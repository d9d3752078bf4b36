//! Armor, weapon and tool proficiencies

use crate::domain::entities::{CoreSelections, Proficiencies};
use crate::domain::rules::{RuleTables, RulesError};

use super::dedup_by_name;

pub struct ProficienciesGenerator<'a> {
    tables: &'a RuleTables,
}

impl<'a> ProficienciesGenerator<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    pub fn generate(&self, core: &CoreSelections<'_>) -> Result<Proficiencies, RulesError> {
        let race = self.tables.race(core.race_id)?;
        let class = self.tables.class(core.class_id)?;
        let background = self.tables.background(core.background_id)?;

        Ok(Proficiencies {
            armor: dedup_by_name(&class.armor_proficiencies),
            weapons: dedup_by_name(
                class
                    .weapon_proficiencies
                    .iter()
                    .chain(&race.weapon_proficiencies),
            ),
            tools: dedup_by_name(
                class
                    .tool_proficiencies
                    .iter()
                    .chain(&background.tool_proficiencies),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{core, elf_wizard_sage, halfling_rogue_criminal, srd};

    #[test]
    fn test_rogue_criminal_tools_dedupe() {
        let tables = srd();
        let definition = halfling_rogue_criminal();
        let proficiencies = ProficienciesGenerator::new(&tables)
            .generate(&core(&definition))
            .unwrap();
        assert_eq!(proficiencies.armor, vec!["Light armor"]);
        // Thieves' tools come from both class and background
        assert_eq!(proficiencies.tools, vec!["Thieves' tools", "Gaming set"]);
        assert!(proficiencies.has_weapon("Rapier"));
    }

    #[test]
    fn test_elf_wizard_weapons_include_race_training() {
        let tables = srd();
        let definition = elf_wizard_sage();
        let proficiencies = ProficienciesGenerator::new(&tables)
            .generate(&core(&definition))
            .unwrap();
        assert!(proficiencies.armor.is_empty());
        assert!(proficiencies.has_weapon("Quarterstaff"));
        assert!(proficiencies.has_weapon("Longbow"));
        assert!(proficiencies.tools.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let tables = srd();
        let definition = halfling_rogue_criminal();
        let generator = ProficienciesGenerator::new(&tables);
        let first = serde_json::to_vec(&generator.generate(&core(&definition)).unwrap()).unwrap();
        let second = serde_json::to_vec(&generator.generate(&core(&definition)).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
