// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler registry: who is subscribed to what

use crate::handler::EventHandler;
use crate::id::{HandlerId, IdGen, UuidIdGen};
use crate::permission::Principal;
use crate::topic::{Topic, TopicPattern};
use std::fmt;
use std::sync::{Arc, RwLock};

/// A registered handler and the topics it is interested in
pub struct Subscription {
    pub id: HandlerId,
    pub patterns: Vec<TopicPattern>,
    pub principal: Principal,
    pub handler: Arc<dyn EventHandler>,
}

impl Subscription {
    /// Check if any pattern matches the topic
    pub fn matches(&self, topic: &Topic) -> bool {
        self.patterns.iter().any(|p| p.matches(topic))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("patterns", &self.patterns)
            .field("principal", &self.principal)
            .finish_non_exhaustive()
    }
}

/// Registration-ordered set of subscriptions
///
/// `resolve` hands out a snapshot: later register/unregister calls never
/// change a sequence that has already been returned.
pub struct HandlerRegistry<I: IdGen = UuidIdGen> {
    subscriptions: Arc<RwLock<Vec<Arc<Subscription>>>>,
    id_gen: I,
}

impl HandlerRegistry<UuidIdGen> {
    pub fn new() -> Self {
        Self::with_id_gen(UuidIdGen)
    }
}

impl Default for HandlerRegistry<UuidIdGen> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: IdGen> HandlerRegistry<I> {
    pub fn with_id_gen(id_gen: I) -> Self {
        Self {
            subscriptions: Arc::new(RwLock::new(Vec::new())),
            id_gen,
        }
    }

    /// Add a subscription; every call yields a fresh id
    pub fn register(
        &self,
        patterns: Vec<TopicPattern>,
        principal: Principal,
        handler: Arc<dyn EventHandler>,
    ) -> HandlerId {
        let id = self.id_gen.next();
        let subscription = Arc::new(Subscription {
            id: id.clone(),
            patterns,
            principal,
            handler,
        });

        let mut subs = self
            .subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner());
        subs.push(subscription);

        tracing::debug!(handler = %id, "registered");
        id
    }

    /// Remove a subscription. Returns false if the id was unknown.
    pub fn unregister(&self, id: &HandlerId) -> bool {
        let mut subs = self
            .subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let before = subs.len();
        subs.retain(|s| &s.id != id);
        let removed = subs.len() != before;

        if removed {
            tracing::debug!(handler = %id, "unregistered");
        }
        removed
    }

    /// Snapshot of subscriptions matching `topic`, in registration order
    pub fn resolve(&self, topic: &Topic) -> Vec<Arc<Subscription>> {
        self.subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| s.matches(topic))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &HandlerId) -> Option<Arc<Subscription>> {
        self.subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    /// Get count of active subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all subscription ids in registration order
    pub fn ids(&self) -> Vec<HandlerId> {
        self.subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|s| s.id.clone())
            .collect()
    }
}

impl<I: IdGen> Clone for HandlerRegistry<I> {
    fn clone(&self) -> Self {
        Self {
            subscriptions: Arc::clone(&self.subscriptions),
            id_gen: self.id_gen.clone(),
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
