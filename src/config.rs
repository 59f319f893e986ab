//! Engine configuration loaded from TOML
//!
//! ```toml
//! templates-dir = "/etc/docweave/templates"
//!
//! [cache]
//! template-ttl-hours = 24
//! template-capacity = 500
//! resource-ttl-hours = 12
//! resource-capacity = 200
//!
//! [preload]
//! ids = ["base-enrollment.yaml"]
//!
//! [preload.namespaces]
//! tenant-a = ["composite-enrollment.yaml"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::cache::CacheConfig;

/// Errors loading an engine configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineConfig {
    /// Root directory for the local-disk override store
    pub templates_dir: Option<PathBuf>,
    pub cache: CacheSettings,
    pub preload: PreloadSettings,
}

/// TTL and capacity for the two caches
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CacheSettings {
    pub template_ttl_hours: u64,
    pub template_capacity: usize,
    pub resource_ttl_hours: u64,
    pub resource_capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            template_ttl_hours: 24,
            template_capacity: 500,
            resource_ttl_hours: 12,
            resource_capacity: 200,
        }
    }
}

/// Templates warmed into the cache at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PreloadSettings {
    /// Template ids preloaded from the shared namespace
    pub ids: Vec<String>,
    /// Per-namespace preload lists
    pub namespaces: BTreeMap<String, Vec<String>>,
}

impl PreloadSettings {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.namespaces.is_empty()
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_str(&content)?)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Set the local-disk store root
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    /// Cache configuration for the resolver
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .with_template_ttl(Duration::from_secs(self.cache.template_ttl_hours * 3600))
            .with_template_capacity(self.cache.template_capacity)
            .with_resource_ttl(Duration::from_secs(self.cache.resource_ttl_hours * 3600))
            .with_resource_capacity(self.cache.resource_capacity)
    }
}
