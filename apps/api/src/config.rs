use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_BLURBS_PER_FIELD: u32 = 3;
const MAX_BLURBS_PER_FIELD: u32 = 10;

/// Application configuration loaded from environment variables.
/// Everything except the port has a working default, so the service starts
/// against an in-memory store when no database is configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres for blurb storage and the read-only candidate context tables.
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub templates_dir: PathBuf,
    pub default_template: String,
    /// `None` makes every generation fail with a permanent error.
    pub anthropic_api_key: Option<String>,
    pub llm_max_attempts: u32,
    pub blurbs_per_field: u32,
    pub generation_timeout: Duration,
    pub candidate_context_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            database_url: get("DATABASE_URL"),
            templates_dir: get("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("cv_templates")),
            default_template: get("DEFAULT_TEMPLATE").unwrap_or_else(|| "classic".to_string()),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            llm_max_attempts: get("LLM_MAX_ATTEMPTS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("LLM_MAX_ATTEMPTS must be a positive integer")?
                .unwrap_or(1)
                .max(1),
            blurbs_per_field: clamp_blurbs_per_field(
                get("BLURBS_PER_FIELD")
                    .map(|v| v.parse::<u32>())
                    .transpose()
                    .context("BLURBS_PER_FIELD must be a positive integer")?
                    .unwrap_or(DEFAULT_BLURBS_PER_FIELD),
            ),
            generation_timeout: Duration::from_secs(
                get("GENERATION_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("GENERATION_TIMEOUT_SECS must be a number of seconds")?
                    .unwrap_or(120),
            ),
            candidate_context_path: get("CANDIDATE_CONTEXT_PATH").map(PathBuf::from),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Candidates requested per generation, kept within 1..=10.
pub fn clamp_blurbs_per_field(requested: u32) -> u32 {
    requested.clamp(1, MAX_BLURBS_PER_FIELD)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_select_in_memory_mode() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.default_template, "classic");
        assert_eq!(config.templates_dir, PathBuf::from("cv_templates"));
        assert_eq!(config.blurbs_per_field, 3);
        assert_eq!(config.llm_max_attempts, 1);
        assert_eq!(config.generation_timeout, Duration::from_secs(120));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_values_are_treated_as_unset() {
        let config = config_from(&[("ANTHROPIC_API_KEY", "  "), ("DATABASE_URL", "")]).unwrap();
        assert!(config.anthropic_api_key.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_blurbs_per_field_is_clamped() {
        assert_eq!(clamp_blurbs_per_field(0), 1);
        assert_eq!(clamp_blurbs_per_field(4), 4);
        assert_eq!(clamp_blurbs_per_field(50), 10);

        let config = config_from(&[("BLURBS_PER_FIELD", "25")]).unwrap();
        assert_eq!(config.blurbs_per_field, 10);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("GENERATION_TIMEOUT_SECS", "soon")]).is_err());
    }
}
