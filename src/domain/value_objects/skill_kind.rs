//! The fixed skill list and the ability each skill uses

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Ability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKind {
    Acrobatics,
    #[serde(rename = "Animal Handling")]
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    #[serde(rename = "Sleight of Hand")]
    SleightOfHand,
    Stealth,
    Survival,
}

impl SkillKind {
    /// Every skill, in sheet (alphabetical) order
    pub const ALL: [SkillKind; 18] = [
        SkillKind::Acrobatics,
        SkillKind::AnimalHandling,
        SkillKind::Arcana,
        SkillKind::Athletics,
        SkillKind::Deception,
        SkillKind::History,
        SkillKind::Insight,
        SkillKind::Intimidation,
        SkillKind::Investigation,
        SkillKind::Medicine,
        SkillKind::Nature,
        SkillKind::Perception,
        SkillKind::Performance,
        SkillKind::Persuasion,
        SkillKind::Religion,
        SkillKind::SleightOfHand,
        SkillKind::Stealth,
        SkillKind::Survival,
    ];

    pub fn ability(&self) -> Ability {
        match self {
            SkillKind::Athletics => Ability::Strength,
            SkillKind::Acrobatics | SkillKind::SleightOfHand | SkillKind::Stealth => {
                Ability::Dexterity
            }
            SkillKind::Arcana
            | SkillKind::History
            | SkillKind::Investigation
            | SkillKind::Nature
            | SkillKind::Religion => Ability::Intelligence,
            SkillKind::AnimalHandling
            | SkillKind::Insight
            | SkillKind::Medicine
            | SkillKind::Perception
            | SkillKind::Survival => Ability::Wisdom,
            SkillKind::Deception
            | SkillKind::Intimidation
            | SkillKind::Performance
            | SkillKind::Persuasion => Ability::Charisma,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SkillKind::Acrobatics => "Acrobatics",
            SkillKind::AnimalHandling => "Animal Handling",
            SkillKind::Arcana => "Arcana",
            SkillKind::Athletics => "Athletics",
            SkillKind::Deception => "Deception",
            SkillKind::History => "History",
            SkillKind::Insight => "Insight",
            SkillKind::Intimidation => "Intimidation",
            SkillKind::Investigation => "Investigation",
            SkillKind::Medicine => "Medicine",
            SkillKind::Nature => "Nature",
            SkillKind::Perception => "Perception",
            SkillKind::Performance => "Performance",
            SkillKind::Persuasion => "Persuasion",
            SkillKind::Religion => "Religion",
            SkillKind::SleightOfHand => "Sleight of Hand",
            SkillKind::Stealth => "Stealth",
            SkillKind::Survival => "Survival",
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SkillKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SkillKind::ALL
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown skill: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("arcana".parse::<SkillKind>(), Ok(SkillKind::Arcana));
        assert_eq!(
            " Sleight of hand ".parse::<SkillKind>(),
            Ok(SkillKind::SleightOfHand)
        );
        assert!("Basket Weaving".parse::<SkillKind>().is_err());
    }

    #[test]
    fn test_related_abilities() {
        assert_eq!(SkillKind::Arcana.ability(), Ability::Intelligence);
        assert_eq!(SkillKind::Athletics.ability(), Ability::Strength);
        assert_eq!(SkillKind::Perception.ability(), Ability::Wisdom);
        assert_eq!(SkillKind::Persuasion.ability(), Ability::Charisma);
    }
}
