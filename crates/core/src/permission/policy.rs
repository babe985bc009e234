// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rule-based permission oracle
//!
//! Rules are evaluated in order; the first rule whose principal, action and
//! topic pattern all match decides. Requests no rule matches get the
//! configured default, which is `deny` unless stated otherwise.

use super::{Decision, PermissionOracle, Principal, TopicAction};
use crate::topic::{Topic, TopicPattern};
use serde::{Deserialize, Serialize};

const ANY_PRINCIPAL: &str = "*";

/// Ordered rule list plus the fallback decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_decision")]
    pub default: Decision,
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

fn default_decision() -> Decision {
    Decision::Deny
}

fn both_actions() -> Vec<TopicAction> {
    vec![TopicAction::Publish, TopicAction::Subscribe]
}

fn allow_by_default() -> bool {
    true
}

/// A rule granting or refusing actions on a set of topics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Principal name, or `*` for anyone
    pub principal: String,
    pub topics: Vec<TopicPattern>,
    #[serde(default = "both_actions")]
    pub actions: Vec<TopicAction>,
    /// If true, grant. If false, refuse.
    #[serde(default = "allow_by_default")]
    pub allow: bool,
}

impl PolicyRule {
    fn applies(&self, principal: &Principal, topic: &Topic, action: TopicAction) -> bool {
        (self.principal == ANY_PRINCIPAL || self.principal == principal.as_str())
            && self.actions.contains(&action)
            && self.topics.iter().any(|p| p.matches(topic))
    }
}

impl PolicyConfig {
    pub fn new(default: Decision) -> Self {
        Self {
            default,
            rules: Vec::new(),
        }
    }

    /// Append a rule
    pub fn add_rule(
        &mut self,
        principal: &str,
        topics: Vec<TopicPattern>,
        actions: Vec<TopicAction>,
        allow: bool,
    ) {
        self.rules.push(PolicyRule {
            principal: principal.to_string(),
            topics,
            actions,
            allow,
        });
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::new(Decision::Deny)
    }
}

/// Oracle evaluating a [`PolicyConfig`]
#[derive(Debug, Clone, Default)]
pub struct PolicyOracle {
    config: PolicyConfig,
}

impl PolicyOracle {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }
}

impl PermissionOracle for PolicyOracle {
    fn authorize(&self, principal: &Principal, topic: &Topic, action: TopicAction) -> Decision {
        self.config
            .rules
            .iter()
            .find(|rule| rule.applies(principal, topic, action))
            .map_or(self.config.default, |rule| Decision::from(rule.allow))
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
