// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::client::DEFAULT_API_BASE;
use crate::ingest::DEFAULT_DAYS_BACK;

const ENV_PATH: &str = "NEWSROOM_CONFIG_PATH";
const DEFAULT_PATH: &str = "config/newsroom.toml";

/// Service configuration. Resolution order:
/// 1) TOML file at $NEWSROOM_CONFIG_PATH
/// 2) config/newsroom.toml
/// 3) built-in defaults
/// with individual NEWSROOM_* env vars applied on top.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    pub api_base: String,
    pub page_size: u32,
    pub days_back: i64,
    pub scheduler_enabled: bool,
    pub scheduler_interval_secs: u64,
    pub summary_batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: 100,
            days_back: DEFAULT_DAYS_BACK,
            scheduler_enabled: false,
            scheduler_interval_secs: 3600,
            summary_batch_size: 100,
        }
    }
}

impl IngestConfig {
    pub fn load() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("NEWSROOM_CONFIG_PATH points to non-existent path"));
            }
            Self::from_file(&pb)?
        } else {
            let default = Path::new(DEFAULT_PATH);
            if default.exists() {
                Self::from_file(default)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("NEWSROOM_API_BASE") {
            if !v.is_empty() {
                self.api_base = v;
            }
        }
        if let Some(v) = env_parse::<u32>("NEWSROOM_PAGE_SIZE") {
            self.page_size = v;
        }
        if let Some(v) = env_parse::<i64>("NEWSROOM_DAYS_BACK") {
            self.days_back = v;
        }
        if let Some(v) = env_parse::<u64>("NEWSROOM_SCHEDULER_INTERVAL_SECS") {
            self.scheduler_interval_secs = v;
        }
        if let Ok(v) = std::env::var("NEWSROOM_SCHEDULER") {
            self.scheduler_enabled = v == "1";
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_defaults_field_by_field() {
        let cfg: IngestConfig = toml::from_str(
            r#"
            page_size = 50
            scheduler_enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.page_size, 50);
        assert!(cfg.scheduler_enabled);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.days_back, 7);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_apply_on_top() {
        std::env::set_var("NEWSROOM_PAGE_SIZE", "25");
        std::env::set_var("NEWSROOM_SCHEDULER", "1");
        let mut cfg = IngestConfig::default();
        cfg.apply_env_overrides();
        std::env::remove_var("NEWSROOM_PAGE_SIZE");
        std::env::remove_var("NEWSROOM_SCHEDULER");
        assert_eq!(cfg.page_size, 25);
        assert!(cfg.scheduler_enabled);
    }
}
