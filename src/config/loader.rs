use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;
use tracing::debug;

use super::ExecutorConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Prefix for environment overrides, e.g. `FANOUT_MAX_THREADS=4`
pub const ENV_PREFIX: &str = "FANOUT_";

impl ExecutorConfig {
    /// Load embedded defaults overridden by `FANOUT_*` environment variables
    pub fn load() -> Result<Self> {
        Self::extract(Self::base_figment().merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Load embedded defaults, then `path`, then `FANOUT_*` environment variables.
    ///
    /// The file format follows the extension: `.toml`, `.json`, `.yaml` or `.yml`.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::base_figment().merge(Toml::file(path)),
            Some("json") => Self::base_figment().merge(Json::file(path)),
            Some("yaml" | "yml") => Self::base_figment().merge(Yaml::file(path)),
            _ => anyhow::bail!("Unsupported config format: {}", path.display()),
        };

        debug!(path = %path.display(), "loading executor config");

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX)))
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    fn base_figment() -> Figment {
        Figment::new().merge(Toml::string(DEFAULT_CONFIG))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: ExecutorConfig = figment
            .extract()
            .context("Failed to parse executor configuration")?;
        config.validate()?;

        debug!(
            max_threads = config.max_threads,
            thread_percentage = config.thread_percentage,
            "executor config loaded"
        );

        Ok(config)
    }
}
