// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced oracle wrapper for auditing permission decisions

use super::{Decision, PermissionOracle, Principal, TopicAction};
use crate::topic::Topic;

/// Wrapper that logs every decision made by the inner oracle
#[derive(Clone, Debug, Default)]
pub struct TracedOracle<O> {
    inner: O,
}

impl<O> TracedOracle<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: PermissionOracle> PermissionOracle for TracedOracle<O> {
    fn authorize(&self, principal: &Principal, topic: &Topic, action: TopicAction) -> Decision {
        let decision = self.inner.authorize(principal, topic, action);
        match decision {
            Decision::Allow => tracing::trace!(
                principal = %principal,
                topic = %topic,
                action = %action,
                "permission granted"
            ),
            Decision::Deny => tracing::info!(
                principal = %principal,
                topic = %topic,
                action = %action,
                "permission denied"
            ),
        }
        decision
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
