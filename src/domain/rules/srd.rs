//! Built-in SRD-style rule tables

use std::collections::BTreeMap;

use crate::domain::value_objects::{Ability, Die, SkillKind};

use super::tables::*;

const SRD_VERSION: &str = "srd-5.1-core-1";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn bonus(ability: Ability, bonus: i32) -> AbilityBonus {
    AbilityBonus { ability, bonus }
}

fn armor(name: &str, category: ArmorCategory, armor_class: i32, dex_cap: Option<i32>) -> ArmorEntry {
    ArmorEntry {
        name: name.to_string(),
        category,
        armor_class,
        dex_cap,
    }
}

fn weapon(
    name: &str,
    category: WeaponCategory,
    range: WeaponRange,
    finesse: bool,
    damage_die: Die,
    damage_type: &str,
) -> WeaponEntry {
    WeaponEntry {
        name: name.to_string(),
        category,
        range,
        finesse,
        damage_dice: 1,
        damage_die,
        damage_type: damage_type.to_string(),
    }
}

impl RuleTables {
    /// The rule data compiled into the engine
    pub fn srd() -> Self {
        Self {
            version: SRD_VERSION.to_string(),
            races: races(),
            classes: classes(),
            backgrounds: backgrounds(),
            armor: armor_table(),
            weapons: weapon_table(),
            language_pool: strings(&[
                "Dwarvish",
                "Elvish",
                "Giant",
                "Gnomish",
                "Goblin",
                "Halfling",
                "Orc",
                "Abyssal",
                "Celestial",
                "Draconic",
                "Deep Speech",
                "Infernal",
                "Primordial",
                "Sylvan",
                "Undercommon",
            ]),
        }
    }
}

fn races() -> BTreeMap<String, RaceEntry> {
    let mut races = BTreeMap::new();
    races.insert(
        "elf".to_string(),
        RaceEntry {
            name: "Elf".to_string(),
            ability_bonuses: vec![bonus(Ability::Dexterity, 2), bonus(Ability::Intelligence, 1)],
            speed: 30,
            languages: strings(&["Common", "Elvish"]),
            extra_language_choices: 0,
            skills: vec![SkillKind::Perception],
            weapon_proficiencies: strings(&["Longsword", "Shortsword", "Shortbow", "Longbow"]),
            traits: vec![
                FeatureEntry::new(
                    "Darkvision",
                    "You can see in dim light within 60 feet as if it were bright light, and in darkness as if it were dim light.",
                ),
                FeatureEntry::new(
                    "Keen Senses",
                    "You have proficiency in the Perception skill.",
                ),
                FeatureEntry::new(
                    "Fey Ancestry",
                    "You have advantage on saving throws against being charmed, and magic can't put you to sleep.",
                ),
                FeatureEntry::new(
                    "Trance",
                    "You meditate deeply for 4 hours a day instead of sleeping, gaining the benefit of a long rest.",
                ),
            ],
        },
    );
    races.insert(
        "human".to_string(),
        RaceEntry {
            name: "Human".to_string(),
            ability_bonuses: Ability::ALL.iter().map(|a| bonus(*a, 1)).collect(),
            speed: 30,
            languages: strings(&["Common"]),
            extra_language_choices: 1,
            skills: Vec::new(),
            weapon_proficiencies: Vec::new(),
            traits: vec![FeatureEntry::new(
                "Versatile",
                "Your ability scores each increase by 1, and you learn one extra language.",
            )],
        },
    );
    races.insert(
        "dwarf".to_string(),
        RaceEntry {
            name: "Dwarf".to_string(),
            ability_bonuses: vec![bonus(Ability::Constitution, 2), bonus(Ability::Wisdom, 1)],
            speed: 25,
            languages: strings(&["Common", "Dwarvish"]),
            extra_language_choices: 0,
            skills: Vec::new(),
            weapon_proficiencies: strings(&["Battleaxe", "Handaxe", "Light hammer", "Warhammer"]),
            traits: vec![
                FeatureEntry::new(
                    "Darkvision",
                    "You can see in dim light within 60 feet as if it were bright light, and in darkness as if it were dim light.",
                ),
                FeatureEntry::new(
                    "Dwarven Resilience",
                    "You have advantage on saving throws against poison and resistance to poison damage.",
                ),
                FeatureEntry::new(
                    "Stonecunning",
                    "You add double your proficiency bonus to History checks about the origin of stonework.",
                ),
            ],
        },
    );
    races.insert(
        "halfling".to_string(),
        RaceEntry {
            name: "Halfling".to_string(),
            ability_bonuses: vec![bonus(Ability::Dexterity, 2), bonus(Ability::Charisma, 1)],
            speed: 25,
            languages: strings(&["Common", "Halfling"]),
            extra_language_choices: 0,
            skills: Vec::new(),
            weapon_proficiencies: Vec::new(),
            traits: vec![
                FeatureEntry::new(
                    "Lucky",
                    "When you roll a 1 on an attack roll, ability check, or saving throw, you can reroll the die.",
                ),
                FeatureEntry::new(
                    "Brave",
                    "You have advantage on saving throws against being frightened.",
                ),
                FeatureEntry::new(
                    "Halfling Nimbleness",
                    "You can move through the space of any creature that is of a size larger than yours.",
                ),
            ],
        },
    );
    races
}

fn classes() -> BTreeMap<String, ClassEntry> {
    use Ability::*;

    let mut classes = BTreeMap::new();
    classes.insert(
        "wizard".to_string(),
        ClassEntry {
            name: "Wizard".to_string(),
            hit_die: Die::D6,
            ability_priority: vec![Intelligence, Constitution, Dexterity, Wisdom, Charisma, Strength],
            saving_throws: vec![Intelligence, Wisdom],
            skill_options: vec![
                SkillKind::Arcana,
                SkillKind::History,
                SkillKind::Insight,
                SkillKind::Investigation,
                SkillKind::Medicine,
                SkillKind::Religion,
            ],
            skill_count: 2,
            armor_proficiencies: Vec::new(),
            weapon_proficiencies: strings(&["Dagger", "Dart", "Sling", "Quarterstaff", "Light crossbow"]),
            tool_proficiencies: Vec::new(),
            spellcasting_ability: Some(Intelligence),
            features: vec![
                FeatureEntry::new(
                    "Spellcasting",
                    "You cast wizard spells prepared from your spellbook, using Intelligence as your spellcasting ability.",
                ),
                FeatureEntry::new(
                    "Arcane Recovery",
                    "Once per day after a short rest, you can recover expended spell slots with a combined level up to half your wizard level.",
                ),
                FeatureEntry::new(
                    "Arcane Tradition",
                    "You choose a school of magic to specialize in, gaining features from it.",
                )
                .at_level(2),
            ],
        },
    );
    classes.insert(
        "fighter".to_string(),
        ClassEntry {
            name: "Fighter".to_string(),
            hit_die: Die::D10,
            ability_priority: vec![Strength, Constitution, Dexterity, Wisdom, Charisma, Intelligence],
            saving_throws: vec![Strength, Constitution],
            skill_options: vec![
                SkillKind::Acrobatics,
                SkillKind::AnimalHandling,
                SkillKind::Athletics,
                SkillKind::History,
                SkillKind::Insight,
                SkillKind::Intimidation,
                SkillKind::Perception,
                SkillKind::Survival,
            ],
            skill_count: 2,
            armor_proficiencies: strings(&["Light armor", "Medium armor", "Heavy armor", "Shields"]),
            weapon_proficiencies: strings(&["Simple weapons", "Martial weapons"]),
            tool_proficiencies: Vec::new(),
            spellcasting_ability: None,
            features: vec![
                FeatureEntry::new(
                    "Fighting Style",
                    "You adopt a particular style of fighting as your specialty.",
                ),
                FeatureEntry::new(
                    "Second Wind",
                    "Once per short rest, you can use a bonus action to regain 1d10 + your fighter level hit points.",
                ),
                FeatureEntry::new(
                    "Action Surge",
                    "Once per short rest, you can take one additional action on your turn.",
                )
                .at_level(2),
            ],
        },
    );
    classes.insert(
        "rogue".to_string(),
        ClassEntry {
            name: "Rogue".to_string(),
            hit_die: Die::D8,
            ability_priority: vec![Dexterity, Constitution, Intelligence, Wisdom, Charisma, Strength],
            saving_throws: vec![Dexterity, Intelligence],
            skill_options: vec![
                SkillKind::Acrobatics,
                SkillKind::Athletics,
                SkillKind::Deception,
                SkillKind::Insight,
                SkillKind::Intimidation,
                SkillKind::Investigation,
                SkillKind::Perception,
                SkillKind::Performance,
                SkillKind::Persuasion,
                SkillKind::SleightOfHand,
                SkillKind::Stealth,
            ],
            skill_count: 4,
            armor_proficiencies: strings(&["Light armor"]),
            weapon_proficiencies: strings(&[
                "Simple weapons",
                "Hand crossbow",
                "Longsword",
                "Rapier",
                "Shortsword",
            ]),
            tool_proficiencies: strings(&["Thieves' tools"]),
            spellcasting_ability: None,
            features: vec![
                FeatureEntry::new(
                    "Expertise",
                    "Choose two skill proficiencies; your proficiency bonus is doubled for checks using them.",
                ),
                FeatureEntry::new(
                    "Sneak Attack",
                    "Once per turn, you deal an extra 1d6 damage to a creature you hit with advantage using a finesse or ranged weapon.",
                ),
                FeatureEntry::new(
                    "Thieves' Cant",
                    "You know the secret mix of dialect, jargon, and code used by rogues.",
                ),
                FeatureEntry::new(
                    "Cunning Action",
                    "You can take a bonus action on each of your turns to Dash, Disengage, or Hide.",
                )
                .at_level(2),
            ],
        },
    );
    classes.insert(
        "cleric".to_string(),
        ClassEntry {
            name: "Cleric".to_string(),
            hit_die: Die::D8,
            ability_priority: vec![Wisdom, Constitution, Strength, Charisma, Dexterity, Intelligence],
            saving_throws: vec![Wisdom, Charisma],
            skill_options: vec![
                SkillKind::History,
                SkillKind::Insight,
                SkillKind::Medicine,
                SkillKind::Persuasion,
                SkillKind::Religion,
            ],
            skill_count: 2,
            armor_proficiencies: strings(&["Light armor", "Medium armor", "Shields"]),
            weapon_proficiencies: strings(&["Simple weapons"]),
            tool_proficiencies: Vec::new(),
            spellcasting_ability: Some(Wisdom),
            features: vec![
                FeatureEntry::new(
                    "Spellcasting",
                    "You cast cleric spells through prayer, using Wisdom as your spellcasting ability.",
                ),
                FeatureEntry::new(
                    "Divine Domain",
                    "You choose a domain related to your deity, which grants you domain spells and features.",
                ),
                FeatureEntry::new(
                    "Channel Divinity",
                    "You can channel divine energy directly from your deity to fuel magical effects.",
                )
                .at_level(2),
            ],
        },
    );
    classes
}

fn backgrounds() -> BTreeMap<String, BackgroundEntry> {
    let mut backgrounds = BTreeMap::new();
    backgrounds.insert(
        "sage".to_string(),
        BackgroundEntry {
            name: "Sage".to_string(),
            skills: vec![SkillKind::Arcana, SkillKind::History],
            languages: Vec::new(),
            language_choices: 2,
            tool_proficiencies: Vec::new(),
            feature: FeatureEntry::new(
                "Researcher",
                "When you attempt to recall lore and do not know it, you often know where and from whom you can obtain it.",
            ),
        },
    );
    backgrounds.insert(
        "soldier".to_string(),
        BackgroundEntry {
            name: "Soldier".to_string(),
            skills: vec![SkillKind::Athletics, SkillKind::Intimidation],
            languages: Vec::new(),
            language_choices: 0,
            tool_proficiencies: strings(&["Gaming set", "Vehicles (land)"]),
            feature: FeatureEntry::new(
                "Military Rank",
                "Soldiers loyal to your former military organization still recognize your authority and influence.",
            ),
        },
    );
    backgrounds.insert(
        "acolyte".to_string(),
        BackgroundEntry {
            name: "Acolyte".to_string(),
            skills: vec![SkillKind::Insight, SkillKind::Religion],
            languages: Vec::new(),
            language_choices: 2,
            tool_proficiencies: Vec::new(),
            feature: FeatureEntry::new(
                "Shelter of the Faithful",
                "You and your companions can expect free healing and care at temples of your faith.",
            ),
        },
    );
    backgrounds.insert(
        "criminal".to_string(),
        BackgroundEntry {
            name: "Criminal".to_string(),
            skills: vec![SkillKind::Deception, SkillKind::Stealth],
            languages: Vec::new(),
            language_choices: 0,
            tool_proficiencies: strings(&["Thieves' tools", "Gaming set"]),
            feature: FeatureEntry::new(
                "Criminal Contact",
                "You have a reliable and trustworthy contact who acts as your liaison to a network of other criminals.",
            ),
        },
    );
    backgrounds
}

fn armor_table() -> BTreeMap<String, ArmorEntry> {
    let mut table = BTreeMap::new();
    table.insert("leather".to_string(), armor("Leather", ArmorCategory::Light, 11, None));
    table.insert(
        "studded-leather".to_string(),
        armor("Studded leather", ArmorCategory::Light, 12, None),
    );
    table.insert(
        "scale-mail".to_string(),
        armor("Scale mail", ArmorCategory::Medium, 14, Some(2)),
    );
    table.insert(
        "chain-mail".to_string(),
        armor("Chain mail", ArmorCategory::Heavy, 16, Some(0)),
    );
    table.insert("shield".to_string(), armor("Shield", ArmorCategory::Shield, 2, None));
    table
}

fn weapon_table() -> BTreeMap<String, WeaponEntry> {
    use WeaponCategory::{Martial, Simple};
    use WeaponRange::{Melee, Ranged};

    let mut table = BTreeMap::new();
    table.insert("dagger".to_string(), weapon("Dagger", Simple, Melee, true, Die::D4, "piercing"));
    table.insert(
        "quarterstaff".to_string(),
        weapon("Quarterstaff", Simple, Melee, false, Die::D6, "bludgeoning"),
    );
    table.insert("mace".to_string(), weapon("Mace", Simple, Melee, false, Die::D6, "bludgeoning"));
    table.insert(
        "light-crossbow".to_string(),
        weapon("Light crossbow", Simple, Ranged, false, Die::D8, "piercing"),
    );
    table.insert(
        "shortsword".to_string(),
        weapon("Shortsword", Martial, Melee, true, Die::D6, "piercing"),
    );
    table.insert(
        "longsword".to_string(),
        weapon("Longsword", Martial, Melee, false, Die::D8, "slashing"),
    );
    table.insert("rapier".to_string(), weapon("Rapier", Martial, Melee, true, Die::D8, "piercing"));
    table.insert(
        "shortbow".to_string(),
        weapon("Shortbow", Simple, Ranged, false, Die::D6, "piercing"),
    );
    table.insert(
        "longbow".to_string(),
        weapon("Longbow", Martial, Ranged, false, Die::D8, "piercing"),
    );
    table.insert(
        "battleaxe".to_string(),
        weapon("Battleaxe", Martial, Melee, false, Die::D8, "slashing"),
    );
    table.insert("handaxe".to_string(), weapon("Handaxe", Simple, Melee, false, Die::D6, "slashing"));
    table.insert(
        "warhammer".to_string(),
        weapon("Warhammer", Martial, Melee, false, Die::D8, "bludgeoning"),
    );
    table
}
