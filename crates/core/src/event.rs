// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable events carried by the bus

use crate::topic::{Topic, TopicError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Event properties, ordered by name
pub type Properties = BTreeMap<String, serde_json::Value>;

/// An event: a topic plus a read-only property map
///
/// Cloning is cheap and never shares mutable state; the properties live
/// behind an `Arc` and are only ever exposed by shared reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    topic: Topic,
    properties: Arc<Properties>,
}

impl Event {
    pub fn new(topic: Topic, properties: Properties) -> Self {
        Self {
            topic,
            properties: Arc::new(properties),
        }
    }

    /// Parse the topic and build the event
    pub fn parse(topic: &str, properties: Properties) -> Result<Self, TopicError> {
        Ok(Self::new(Topic::new(topic)?, properties))
    }

    /// Start building an event for `topic`
    pub fn builder(topic: Topic) -> EventBuilder {
        EventBuilder {
            topic,
            properties: Properties::new(),
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&serde_json::Value> {
        self.properties.get(name)
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

/// Accumulates properties before freezing them into an [`Event`]
#[derive(Debug)]
pub struct EventBuilder {
    topic: Topic,
    properties: Properties,
}

impl EventBuilder {
    pub fn property(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Event {
        Event::new(self.topic, self.properties)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
