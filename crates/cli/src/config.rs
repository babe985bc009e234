// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ea.toml` loading
//!
//! Same sections as the library's bus configuration, plus the subscribers
//! the CLI registers before publishing.

use anyhow::{Context, Result};
use ea_core::{BusConfig, DispatcherConfig, PolicyConfig, TopicPattern};
use serde::Deserialize;
use std::path::Path;

/// A subscriber that prints what it receives
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriberConfig {
    pub name: String,
    pub topics: Vec<TopicPattern>,
    /// Identity used for subscribe checks; defaults to `name`
    #[serde(default)]
    pub principal: Option<String>,
}

impl SubscriberConfig {
    pub fn principal(&self) -> &str {
        self.principal.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub policy: Option<PolicyConfig>,
    #[serde(default)]
    pub subscribers: Vec<SubscriberConfig>,
}

impl CliConfig {
    /// Load from `path`, or use defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            dispatcher: self.dispatcher.clone(),
            policy: self.policy.clone(),
        }
    }
}
