//! Features generator - descriptive text for race, class and background features
//!
//! Which features a character has is decided by the rule tables. Only the
//! description text comes from the narrative service, and that service is
//! allowed to fail: every call is bounded by a timeout and retried, and a
//! feature whose description cannot be generated falls back to its static
//! rules summary. A narrative failure never fails the pipeline.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use crate::application::ports::outbound::{ChatMessage, LlmPort, LlmRequest};
use crate::application::services::llm::{build_system_prompt, build_user_message, FeaturePromptContext};
use crate::domain::entities::{
    CharacterDefinition, CoreSelections, Feature, FeatureSource, GenerationStatus,
};
use crate::domain::rules::{FeatureEntry, RuleTables, RulesError};
use crate::domain::value_objects::AppSettings;

/// Upper bound on a single description
const MAX_DESCRIPTION_TOKENS: u32 = 200;

pub struct FeaturesGenerator {
    llm: Arc<dyn LlmPort>,
    settings: AppSettings,
}

impl FeaturesGenerator {
    pub fn new(llm: Arc<dyn LlmPort>, settings: AppSettings) -> Self {
        Self { llm, settings }
    }

    /// Features the character has at its level: race traits, then class
    /// features, then the background feature
    pub fn feature_entries<'t>(
        tables: &'t RuleTables,
        definition: &CharacterDefinition,
        core: &CoreSelections<'_>,
    ) -> Result<Vec<(FeatureSource, &'t FeatureEntry)>, RulesError> {
        let race = tables.race(core.race_id)?;
        let class = tables.class(core.class_id)?;
        let background = tables.background(core.background_id)?;

        let race_traits = race.traits.iter().map(|f| (FeatureSource::Race, f));
        let class_features = class
            .features
            .iter()
            .filter(|f| f.level <= definition.level)
            .map(|f| (FeatureSource::Class, f));
        let background_feature = std::iter::once((FeatureSource::Background, &background.feature));

        Ok(race_traits
            .chain(class_features)
            .chain(background_feature)
            .collect())
    }

    /// Describe every feature of the character. Descriptions are requested
    /// concurrently; output order is table order.
    #[instrument(skip_all, fields(character = %definition.id))]
    pub async fn generate(
        &self,
        tables: &RuleTables,
        definition: &CharacterDefinition,
        core: &CoreSelections<'_>,
    ) -> Result<Vec<Feature>, RulesError> {
        let entries = Self::feature_entries(tables, definition, core)?;
        let context = FeaturePromptContext {
            character_name: definition.name.clone(),
            race: tables.race(core.race_id)?.name.clone(),
            class: tables.class(core.class_id)?.name.clone(),
            background: tables.background(core.background_id)?.name.clone(),
            level: definition.level,
            motivation: definition.motivation.clone(),
            backstory: definition.backstory.clone(),
        };

        let features = join_all(
            entries
                .iter()
                .map(|(source, entry)| self.describe(&context, *source, entry)),
        )
        .await;

        let fallbacks = features
            .iter()
            .filter(|f| f.generation_status == GenerationStatus::Fallback)
            .count();
        if fallbacks > 0 && self.settings.narrative_enabled {
            warn!(
                "{} of {} feature descriptions used fallback text",
                fallbacks,
                features.len()
            );
        }

        Ok(features)
    }

    async fn describe(
        &self,
        context: &FeaturePromptContext,
        source: FeatureSource,
        entry: &FeatureEntry,
    ) -> Feature {
        if !self.settings.narrative_enabled {
            return fallback(source, entry);
        }

        let request = LlmRequest::new(vec![ChatMessage::user(build_user_message(
            context, source, entry,
        ))])
        .with_system_prompt(build_system_prompt())
        .with_temperature(self.settings.narrative_temperature)
        .with_max_tokens(Some(MAX_DESCRIPTION_TOKENS));

        let attempts = self.settings.narrative_attempts();
        let timeout = self.settings.narrative_timeout();

        for attempt in 1..=attempts {
            match tokio::time::timeout(timeout, self.llm.generate(request.clone())).await {
                Ok(Ok(response)) => {
                    let text = response.content.trim();
                    if !text.is_empty() {
                        debug!("Generated description for feature '{}'", entry.name);
                        return Feature {
                            title: entry.name.clone(),
                            description: text.to_string(),
                            source,
                            generation_status: GenerationStatus::Generated,
                        };
                    }
                    warn!(
                        "Empty description for feature '{}' (attempt {}/{})",
                        entry.name, attempt, attempts
                    );
                }
                Ok(Err(e)) => {
                    warn!(
                        "Description request for feature '{}' failed (attempt {}/{}): {}",
                        entry.name, attempt, attempts, e
                    );
                }
                Err(_) => {
                    warn!(
                        "Description request for feature '{}' timed out after {:?} (attempt {}/{})",
                        entry.name, timeout, attempt, attempts
                    );
                }
            }
        }

        fallback(source, entry)
    }
}

fn fallback(source: FeatureSource, entry: &FeatureEntry) -> Feature {
    Feature {
        title: entry.name.clone(),
        description: entry.summary.clone(),
        source,
        generation_status: GenerationStatus::Fallback,
    }
}
