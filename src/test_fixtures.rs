//! Shared builders for tests

use crate::domain::entities::{CharacterDefinition, CoreSelections, EquippedItem};
use crate::domain::rules::RuleTables;
use crate::domain::value_objects::{AppSettings, CharacterId};

pub fn srd() -> RuleTables {
    RuleTables::srd()
}

/// The reference character: an elven wizard with the sage background
pub fn elf_wizard_sage() -> CharacterDefinition {
    CharacterDefinition::new(CharacterId::new(), "Aelar Galanodel")
        .with_race("Elf")
        .with_class("Wizard")
        .with_background("Sage")
        .with_motivation("Recover the lost pages of the Codex of Dusk")
}

pub fn dwarf_fighter_soldier() -> CharacterDefinition {
    CharacterDefinition::new(CharacterId::new(), "Brunhild Ironfist")
        .with_race("dwarf")
        .with_class("fighter")
        .with_background("soldier")
        .with_equipment(EquippedItem::armor("chain-mail"))
        .with_equipment(EquippedItem::shield("shield"))
        .with_equipment(EquippedItem::weapon("warhammer"))
        .with_equipment(EquippedItem::weapon("light-crossbow"))
}

pub fn halfling_rogue_criminal() -> CharacterDefinition {
    CharacterDefinition::new(CharacterId::new(), "Milo Tealeaf")
        .with_race("halfling")
        .with_class("rogue")
        .with_background("criminal")
        .with_equipment(EquippedItem::armor("leather"))
        .with_equipment(EquippedItem::weapon("rapier"))
        .with_equipment(EquippedItem::weapon("shortbow"))
}

pub fn core(definition: &CharacterDefinition) -> CoreSelections<'_> {
    definition
        .core_selections()
        .expect("fixture definitions are complete")
}

/// Settings with a short narrative timeout so timeout tests stay fast
pub fn fast_settings() -> AppSettings {
    AppSettings {
        narrative_timeout_ms: 50,
        ..AppSettings::default()
    }
}
