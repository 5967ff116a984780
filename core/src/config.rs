//! Runtime configuration, read from environment variables.

use std::env;
use std::path::PathBuf;

use crate::error::{EcoError, EcoResult};
use crate::model::challenge::ChallengeCategory;
use crate::model::profile::BadgePolicy;
use crate::service::aggregator::AggregatorOptions;

pub const ENV_HOME: &str = "ECOTRACK_HOME";
pub const ENV_SEED: &str = "ECOTRACK_SEED";
pub const ENV_BADGES: &str = "ECOTRACK_BADGES";
pub const ENV_USERNAME: &str = "ECOTRACK_USERNAME";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Data directory; `None` falls back to `~/.ecotrack`.
    pub data_dir: Option<PathBuf>,
    /// Seed sample challenges and a week of history when storage is empty.
    pub seed_on_first_run: bool,
    pub badge_policy: BadgePolicy,
    pub username: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_on_first_run: true,
            badge_policy: BadgePolicy::default(),
            username: AggregatorOptions::default().username,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> EcoResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EcoResult<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_HOME).filter(|d| !d.trim().is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed_on_first_run = parse_bool(&raw)
                .ok_or_else(|| EcoError::Config(format!("{ENV_SEED} must be true or false, got '{raw}'")))?;
        }
        if let Some(raw) = lookup(ENV_BADGES) {
            config.badge_policy = parse_badge_policy(&raw)?;
        }
        if let Some(name) = lookup(ENV_USERNAME).filter(|n| !n.trim().is_empty()) {
            config.username = name.trim().to_string();
        }

        Ok(config)
    }

    pub fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            username: self.username.clone(),
            badge_policy: self.badge_policy.clone(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Comma-separated category names, e.g. `transportation,energy,food,waste`.
pub fn parse_badge_policy(raw: &str) -> EcoResult<BadgePolicy> {
    let mut categories = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let category = ChallengeCategory::parse(token)
            .ok_or_else(|| EcoError::Config(format!("unknown badge category '{token}'")))?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(BadgePolicy { categories })
}
