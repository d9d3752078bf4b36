//! Domain services - the deterministic sheet stages
//!
//! Every calculator here is a pure function of the character definition,
//! the rule tables and the outputs of earlier stages.

mod ability_scores;
mod attacks;
mod combat_stats;
mod languages;
mod proficiencies;
mod skills;

pub use ability_scores::AbilityScoreCalculator;
pub use attacks::AttacksGenerator;
pub use combat_stats::CombatStatsCalculator;
pub use languages::LanguagesGenerator;
pub use proficiencies::ProficienciesGenerator;
pub use skills::SkillsGenerator;

/// Drop repeated names (case-insensitive), keeping the first spelling and
/// the original order
pub(crate) fn dedup_by_name<'a>(names: impl IntoIterator<Item = &'a String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if trimmed.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(trimmed)) {
            continue;
        }
        seen.push(trimmed.to_string());
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_spelling() {
        let names = vec![
            "Common".to_string(),
            "elvish".to_string(),
            "COMMON".to_string(),
            "Elvish".to_string(),
            " ".to_string(),
        ];
        assert_eq!(dedup_by_name(&names), vec!["Common", "elvish"]);
    }
}
