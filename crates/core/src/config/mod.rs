// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus configuration loaded from TOML
//!
//! ```toml
//! [dispatcher]
//! idle_timeout = "30s"
//!
//! [policy]
//! default = "deny"
//!
//! [[policy.rules]]
//! principal = "alice"
//! topics = ["org/example/*"]
//! actions = ["publish"]
//! ```

use crate::bus::EventBus;
use crate::dispatcher::DispatcherConfig;
use crate::permission::{Decision, PolicyConfig, PolicyOracle, TracedOracle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Everything needed to assemble a bus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusConfig {
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    /// Access policy; without one every action is allowed
    #[serde(default)]
    pub policy: Option<PolicyConfig>,
}

impl BusConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The configured policy, or one that allows everything
    pub fn oracle(&self) -> PolicyOracle {
        let policy = self
            .policy
            .clone()
            .unwrap_or_else(|| PolicyConfig::new(Decision::Allow));
        PolicyOracle::new(policy)
    }

    /// Build a bus whose permission decisions are logged
    pub fn build_bus(&self) -> EventBus<TracedOracle<PolicyOracle>> {
        EventBus::builder()
            .oracle(TracedOracle::new(self.oracle()))
            .dispatcher_config(self.dispatcher.clone())
            .build()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
