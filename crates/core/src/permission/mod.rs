// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-topic access control
//!
//! This module provides:
//! - `PermissionOracle` - The external collaborator deciding who may do what
//! - `PermissionGate` - Publish/subscribe checks used by the bus
//! - `PolicyOracle` - Rule-based oracle loaded from configuration
//! - `TracedOracle` - Wrapper that logs every decision

mod policy;
mod traced;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use policy::{PolicyConfig, PolicyOracle, PolicyRule};
pub use traced::TracedOracle;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOracle, OracleCall};

use crate::topic::Topic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identity used for permission decisions
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Principal {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Action being authorized on a topic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicAction {
    Publish,
    Subscribe,
}

impl TopicAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicAction::Publish => "publish",
            TopicAction::Subscribe => "subscribe",
        }
    }
}

impl fmt::Display for TopicAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TopicAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(TopicAction::Publish),
            "subscribe" => Ok(TopicAction::Subscribe),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Outcome of an authorization request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allow: bool) -> Self {
        if allow {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Decides whether a principal may publish or subscribe to a topic
pub trait PermissionOracle: Send + Sync {
    fn authorize(&self, principal: &Principal, topic: &Topic, action: TopicAction) -> Decision;
}

impl<O: PermissionOracle + ?Sized> PermissionOracle for Arc<O> {
    fn authorize(&self, principal: &Principal, topic: &Topic, action: TopicAction) -> Decision {
        (**self).authorize(principal, topic, action)
    }
}

/// Oracle that permits everything
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl PermissionOracle for AllowAll {
    fn authorize(&self, _principal: &Principal, _topic: &Topic, _action: TopicAction) -> Decision {
        Decision::Allow
    }
}

/// Publish/subscribe checks backed by an oracle
#[derive(Clone, Debug, Default)]
pub struct PermissionGate<O> {
    oracle: O,
}

impl<O: PermissionOracle> PermissionGate<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn can_publish(&self, principal: &Principal, topic: &Topic) -> bool {
        self.oracle
            .authorize(principal, topic, TopicAction::Publish)
            .is_allowed()
    }

    pub fn can_subscribe(&self, principal: &Principal, topic: &Topic) -> bool {
        self.oracle
            .authorize(principal, topic, TopicAction::Subscribe)
            .is_allowed()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
