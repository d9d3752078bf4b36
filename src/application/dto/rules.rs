use serde::Serialize;

use crate::domain::rules::RuleTables;

/// An entry that can be referenced from a character definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOptionDto {
    pub id: String,
    pub name: String,
}

/// Ids a character definition may use with the loaded tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTablesSummaryDto {
    pub version: String,
    pub races: Vec<RuleOptionDto>,
    pub classes: Vec<RuleOptionDto>,
    pub backgrounds: Vec<RuleOptionDto>,
    pub armor: Vec<RuleOptionDto>,
    pub weapons: Vec<RuleOptionDto>,
    pub languages: Vec<String>,
}

impl From<&RuleTables> for RuleTablesSummaryDto {
    fn from(tables: &RuleTables) -> Self {
        fn options<'a>(entries: impl Iterator<Item = (&'a String, &'a String)>) -> Vec<RuleOptionDto> {
            entries
                .map(|(id, name)| RuleOptionDto {
                    id: id.clone(),
                    name: name.clone(),
                })
                .collect()
        }

        Self {
            version: tables.version.clone(),
            races: options(tables.races.iter().map(|(id, e)| (id, &e.name))),
            classes: options(tables.classes.iter().map(|(id, e)| (id, &e.name))),
            backgrounds: options(tables.backgrounds.iter().map(|(id, e)| (id, &e.name))),
            armor: options(tables.armor.iter().map(|(id, e)| (id, &e.name))),
            weapons: options(tables.weapons.iter().map(|(id, e)| (id, &e.name))),
            languages: tables.language_pool.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srd_summary_is_sorted_by_id() {
        let summary = RuleTablesSummaryDto::from(&RuleTables::srd());
        assert_eq!(summary.version, "srd-5.1-core-1");
        let races: Vec<&str> = summary.races.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(races, vec!["dwarf", "elf", "halfling", "human"]);
        assert!(summary.classes.iter().any(|c| c.name == "Wizard"));
    }
}
