//! Prompt building functions for feature flavor text

use crate::domain::entities::FeatureSource;
use crate::domain::rules::FeatureEntry;

/// Who the feature belongs to, in display names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturePromptContext {
    pub character_name: String,
    pub race: String,
    pub class: String,
    pub background: String,
    pub level: u8,
    pub motivation: String,
    pub backstory: String,
}

/// Build the system prompt that casts the model as a rules writer
pub fn build_system_prompt() -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "You are a writer for a fantasy tabletop roleplaying game. You describe a \
         character's features and traits as they would appear on a character sheet.\n\n",
    );
    prompt.push_str("RULES:\n");
    prompt.push_str("- Write two or three sentences of in-world flavor.\n");
    prompt.push_str("- Never change the mechanics given in the rules summary.\n");
    prompt.push_str("- Do not use headings, lists or markdown.\n");
    prompt.push_str("- Reply with the description only.\n");
    prompt
}

/// Build the user message describing one feature
pub fn build_user_message(
    context: &FeaturePromptContext,
    source: FeatureSource,
    feature: &FeatureEntry,
) -> String {
    let mut message = String::new();

    message.push_str(&format!(
        "CHARACTER: {}, a level {} {} {}\n",
        context.character_name, context.level, context.race, context.class
    ));
    message.push_str(&format!("BACKGROUND: {}\n", context.background));
    if !context.motivation.trim().is_empty() {
        message.push_str(&format!("MOTIVATION: {}\n", context.motivation.trim()));
    }
    if !context.backstory.trim().is_empty() {
        message.push_str(&format!("BACKSTORY: {}\n", context.backstory.trim()));
    }
    message.push('\n');

    let origin = match source {
        FeatureSource::Race => format!("{} racial trait", context.race),
        FeatureSource::Class => format!("{} class feature", context.class),
        FeatureSource::Background => format!("{} background feature", context.background),
    };
    message.push_str(&format!("FEATURE: {} ({})\n", feature.name, origin));
    message.push_str(&format!("RULES SUMMARY: {}\n\n", feature.summary));
    message.push_str("Describe how this feature shows itself for this character.");

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> FeaturePromptContext {
        FeaturePromptContext {
            character_name: "Aelar".to_string(),
            race: "Elf".to_string(),
            class: "Wizard".to_string(),
            background: "Sage".to_string(),
            level: 1,
            motivation: "Recover the lost pages".to_string(),
            backstory: String::new(),
        }
    }

    #[test]
    fn test_build_system_prompt() {
        let prompt = build_system_prompt();
        assert!(prompt.contains("tabletop"));
        assert!(prompt.contains("two or three sentences"));
    }

    #[test]
    fn test_build_user_message() {
        let feature = FeatureEntry::new("Darkvision", "See in dim light within 60 feet.");
        let message = build_user_message(&context(), FeatureSource::Race, &feature);

        assert!(message.contains("Aelar, a level 1 Elf Wizard"));
        assert!(message.contains("FEATURE: Darkvision (Elf racial trait)"));
        assert!(message.contains("RULES SUMMARY: See in dim light within 60 feet."));
        assert!(message.contains("MOTIVATION: Recover the lost pages"));
        assert!(!message.contains("BACKSTORY"));
    }
}
