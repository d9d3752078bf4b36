//! Known languages from race and background

use crate::domain::entities::{CharacterDefinition, CoreSelections};
use crate::domain::rules::{RuleTables, RulesError};

use super::dedup_by_name;

pub struct LanguagesGenerator<'a> {
    tables: &'a RuleTables,
}

impl<'a> LanguagesGenerator<'a> {
    pub fn new(tables: &'a RuleTables) -> Self {
        Self { tables }
    }

    pub fn generate(
        &self,
        definition: &CharacterDefinition,
        core: &CoreSelections<'_>,
    ) -> Result<Vec<String>, RulesError> {
        let race = self.tables.race(core.race_id)?;
        let background = self.tables.background(core.background_id)?;

        let mut known = dedup_by_name(race.languages.iter().chain(&background.languages));
        let mut open_slots =
            usize::from(race.extra_language_choices) + usize::from(background.language_choices);

        // Player picks first, then the standard pool in table order
        let candidates = definition
            .traits
            .language_choices
            .iter()
            .chain(&self.tables.language_pool);
        for language in candidates {
            if open_slots == 0 {
                break;
            }
            let language = language.trim();
            if language.is_empty() || known.iter().any(|k| k.eq_ignore_ascii_case(language)) {
                continue;
            }
            known.push(language.to_string());
            open_slots -= 1;
        }

        Ok(known)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TraitSelections;
    use crate::test_fixtures::{core, dwarf_fighter_soldier, elf_wizard_sage, srd};

    #[test]
    fn test_elf_sage_gets_two_pool_languages() {
        let tables = srd();
        let definition = elf_wizard_sage();
        let languages = LanguagesGenerator::new(&tables)
            .generate(&definition, &core(&definition))
            .unwrap();
        // Elvish is skipped in the pool because the elf already knows it
        assert_eq!(languages, vec!["Common", "Elvish", "Dwarvish", "Giant"]);
    }

    #[test]
    fn test_player_choices_take_precedence_and_dedupe() {
        let tables = srd();
        let definition = elf_wizard_sage().with_traits(TraitSelections {
            language_choices: vec![
                "elvish".to_string(),
                "Draconic".to_string(),
                "draconic".to_string(),
                "Sylvan".to_string(),
                "Infernal".to_string(),
            ],
            ..TraitSelections::default()
        });
        let languages = LanguagesGenerator::new(&tables)
            .generate(&definition, &core(&definition))
            .unwrap();
        assert_eq!(languages, vec!["Common", "Elvish", "Draconic", "Sylvan"]);
    }

    #[test]
    fn test_no_choices_when_background_grants_none() {
        let tables = srd();
        let definition = dwarf_fighter_soldier();
        let languages = LanguagesGenerator::new(&tables)
            .generate(&definition, &core(&definition))
            .unwrap();
        assert_eq!(languages, vec!["Common", "Dwarvish"]);
    }

    #[test]
    fn test_unknown_background_fails() {
        let tables = srd();
        let definition = elf_wizard_sage().with_background("Pirate");
        let err = LanguagesGenerator::new(&tables)
            .generate(&definition, &core(&definition))
            .unwrap_err();
        assert_eq!(err, RulesError::UnknownBackground("Pirate".to_string()));
    }
}
