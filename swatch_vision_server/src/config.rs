//! Server configuration, resolved from the environment.
//!
//! | Variable          | Default          | Meaning                                      |
//! |-------------------|------------------|----------------------------------------------|
//! | `SV_BIND`         | `127.0.0.1:3001` | Listen address                               |
//! | `SV_STORE_PATH`   | unset            | JSON lines file; unset keeps colors in memory |
//! | `SV_SAMPLE_SIZE`  | `10`             | Edge length of each sample region in pixels  |

use crate::store::{ColorStore, JsonLinesColorStore, MemoryColorStore, StoreResult};
use std::path::PathBuf;
use std::sync::Arc;
use swatch_vision::ExtractorConfig;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    JsonLines(PathBuf),
}

impl StoreConfig {
    /// Builds the configured store. Called once at startup.
    pub fn open(&self) -> StoreResult<Arc<dyn ColorStore>> {
        Ok(match self {
            StoreConfig::Memory => Arc::new(MemoryColorStore::new()),
            StoreConfig::JsonLines(path) => Arc::new(JsonLinesColorStore::open(path)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub store: StoreConfig,
    pub extractor: ExtractorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            store: StoreConfig::Memory,
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let default = Self::default();

        let bind_addr = get("SV_BIND").unwrap_or(default.bind_addr);
        let store = match get("SV_STORE_PATH") {
            Some(path) => StoreConfig::JsonLines(PathBuf::from(path)),
            None => StoreConfig::Memory,
        };

        let mut extractor = ExtractorConfig::builder();
        if let Some(value) = get("SV_SAMPLE_SIZE") {
            let sample_size = value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::Invalid {
                    key: "SV_SAMPLE_SIZE",
                    value,
                    expected: "positive integer",
                })?;
            extractor = extractor.sample_size(sample_size);
        }

        Ok(Self {
            bind_addr,
            store,
            extractor: extractor.build(),
        })
    }
}
