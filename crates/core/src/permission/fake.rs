// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake permission oracle for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Decision, PermissionOracle, Principal, TopicAction};
use crate::topic::{Topic, TopicPattern};
use std::sync::{Arc, Mutex};

/// Recorded authorization request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub principal: Principal,
    pub topic: Topic,
    pub action: TopicAction,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<OracleCall>,
    denied: Vec<(Principal, TopicPattern, TopicAction)>,
}

/// Fake oracle: allows everything except explicitly denied combinations
#[derive(Clone, Default)]
pub struct FakeOracle {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny `action` for `principal` on every topic matching `pattern`
    pub fn deny(&self, principal: &str, pattern: TopicPattern, action: TopicAction) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .denied
            .push((Principal::new(principal), pattern, action));
    }

    /// Get all recorded authorization requests
    pub fn calls(&self) -> Vec<OracleCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Recorded requests for one action
    pub fn calls_for(&self, action: TopicAction) -> Vec<OracleCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.action == action)
            .collect()
    }
}

impl PermissionOracle for FakeOracle {
    fn authorize(&self, principal: &Principal, topic: &Topic, action: TopicAction) -> Decision {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(OracleCall {
            principal: principal.clone(),
            topic: topic.clone(),
            action,
        });
        let denied = state
            .denied
            .iter()
            .any(|(p, pattern, a)| p == principal && *a == action && pattern.matches(topic));
        Decision::from(!denied)
    }
}
