//! config.rs
//! Process-level settings for the store, read from the environment.

use std::path::PathBuf;

use crate::constants::{env_vars, DEFAULT_LOG_LEVEL, DEFAULT_STATE_PATH};
use crate::store::StateStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Location of the durable state image.
    pub state_path: PathBuf,
    /// `tracing` filter directive, e.g. `info` or `hourly_counter_core=debug`.
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl StoreConfig {
    /// `STATE_PATH` and `LOG_LEVEL`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable source.
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            state_path: get(env_vars::STATE_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.state_path),
            log_level: get(env_vars::LOG_LEVEL).unwrap_or(defaults.log_level),
        }
    }

    pub fn open_store(&self) -> StateStore {
        StateStore::load(&self.state_path)
    }
}
