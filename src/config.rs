use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::calendar::MAX_DAYS_FROM_NOW;
use crate::models::SeedConfig;

pub const DEFAULT_BASE_URL: &str = "http://localhost:2345";

/// Seed file compiled into the binary, used when no `--config` is given.
const BUILTIN_SEED: &str = include_str!("../seed.toml");

pub fn load_config(path: &Path) -> Result<SeedConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: SeedConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn builtin_config() -> Result<SeedConfig> {
    let config: SeedConfig =
        toml::from_str(BUILTIN_SEED).context("Failed to parse built-in seed file")?;
    config.validate()?;
    Ok(config)
}

pub fn load_or_builtin(path: Option<&Path>) -> Result<SeedConfig> {
    match path {
        Some(p) => load_config(p),
        None => builtin_config(),
    }
}

/// Flag > environment > seed file > default.
pub fn resolve_base_url(flag: Option<&str>, config: &SeedConfig) -> String {
    flag.or(config.api.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

impl SeedConfig {
    pub fn validate(&self) -> Result<()> {
        let mut short_names = HashSet::new();
        for (key, asoc) in &self.asociations {
            if !short_names.insert(asoc.short_name.as_str()) {
                bail!(
                    "Association '{}' reuses short name '{}'",
                    key,
                    asoc.short_name
                );
            }
        }

        for activity in &self.activities {
            if activity.asociations.is_empty() {
                bail!(
                    "Activity '{}' has no organizing association",
                    activity.activity.name
                );
            }
            let days = activity.activity.days_from_now;
            if !(-MAX_DAYS_FROM_NOW..=MAX_DAYS_FROM_NOW).contains(&days) {
                bail!(
                    "Activity '{}': days_from_now {} is more than {} days away",
                    activity.activity.name,
                    days,
                    MAX_DAYS_FROM_NOW
                );
            }
            for name in &activity.asociations {
                // may already exist server-side
                if !short_names.contains(name.as_str()) {
                    warn!(
                        "Activity '{}' references '{}', which is not in the seed file",
                        activity.activity.name, name
                    );
                }
            }
        }
        Ok(())
    }
}
