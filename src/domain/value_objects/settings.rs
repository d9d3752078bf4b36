//! Pipeline tuning settings
//!
//! Settings are read from `CHARSHEET_*` environment variables, falling back
//! to compiled defaults for anything missing or unparseable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AbilityBounds;

/// A failed feature description is retried at most this many times
pub const MAX_NARRATIVE_RETRIES: u32 = 1;

/// All configurable pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    // Narrative generation
    pub narrative_enabled: bool,
    pub narrative_timeout_ms: u64,
    pub narrative_max_retries: u32,
    pub narrative_temperature: f32,

    // Ability scores
    pub ability_score_min: i32,
    pub ability_score_max: i32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            narrative_enabled: true,
            narrative_timeout_ms: 30_000,
            narrative_max_retries: 1,
            narrative_temperature: 0.7,
            ability_score_min: 1,
            ability_score_max: 20,
        }
    }
}

impl AppSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            narrative_enabled: env_or("CHARSHEET_NARRATIVE_ENABLED", defaults.narrative_enabled),
            narrative_timeout_ms: env_or("CHARSHEET_NARRATIVE_TIMEOUT_MS", defaults.narrative_timeout_ms),
            narrative_max_retries: env_or("CHARSHEET_NARRATIVE_MAX_RETRIES", defaults.narrative_max_retries)
                .min(MAX_NARRATIVE_RETRIES),
            narrative_temperature: env_or("CHARSHEET_NARRATIVE_TEMPERATURE", defaults.narrative_temperature),
            ability_score_min: env_or("CHARSHEET_ABILITY_SCORE_MIN", defaults.ability_score_min),
            ability_score_max: env_or("CHARSHEET_ABILITY_SCORE_MAX", defaults.ability_score_max),
        }
    }

    pub fn narrative_timeout(&self) -> Duration {
        Duration::from_millis(self.narrative_timeout_ms)
    }

    /// Calls made per feature description, first try included
    pub fn narrative_attempts(&self) -> u32 {
        self.narrative_max_retries.min(MAX_NARRATIVE_RETRIES) + 1
    }

    pub fn ability_bounds(&self) -> AbilityBounds {
        AbilityBounds {
            min: self.ability_score_min,
            max: self.ability_score_max.max(self.ability_score_min),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
