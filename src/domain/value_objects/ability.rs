//! The six abilities and their scores

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six abilities, in sheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Position in `ALL`, used to index fixed six-value arrays
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        };
        write!(f, "{}", name)
    }
}

/// Modifier for a raw ability value: floor((value - 10) / 2)
pub fn ability_modifier(value: i32) -> i32 {
    (value - 10).div_euclid(2)
}

/// A single computed ability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub value: i32,
    pub modifier: i32,
}

impl AbilityScore {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            modifier: ability_modifier(value),
        }
    }
}

/// Inclusive range every generated ability value is clamped into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBounds {
    pub min: i32,
    pub max: i32,
}

impl AbilityBounds {
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for AbilityBounds {
    fn default() -> Self {
        Self { min: 1, max: 20 }
    }
}

/// All six ability scores of a character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: AbilityScore,
    pub dexterity: AbilityScore,
    pub constitution: AbilityScore,
    pub intelligence: AbilityScore,
    pub wisdom: AbilityScore,
    pub charisma: AbilityScore,
}

impl AbilityScores {
    /// Build from six raw values in STR..CHA order
    pub fn from_values(values: [i32; 6]) -> Self {
        Self {
            strength: AbilityScore::new(values[0]),
            dexterity: AbilityScore::new(values[1]),
            constitution: AbilityScore::new(values[2]),
            intelligence: AbilityScore::new(values[3]),
            wisdom: AbilityScore::new(values[4]),
            charisma: AbilityScore::new(values[5]),
        }
    }

    pub fn get(&self, ability: Ability) -> AbilityScore {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ability, AbilityScore)> + '_ {
        Ability::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}
