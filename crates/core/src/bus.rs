// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus facade: `send`, `post`, `register`, `unregister`

use crate::delivery::{self, DeliveryReport};
use crate::dispatcher::{Dispatcher, DispatcherConfig};
use crate::error::BusError;
use crate::event::{Event, Properties};
use crate::handler::EventHandler;
use crate::id::{HandlerId, IdGen, UuidIdGen};
use crate::job::DeliveryJob;
use crate::permission::{AllowAll, PermissionGate, PermissionOracle, Principal};
use crate::registry::HandlerRegistry;
use crate::topic::{parse_patterns, TopicPattern};
use std::sync::Arc;
use std::time::Duration;

/// Topic-based publish/subscribe bus
///
/// Cloning is cheap; clones share subscriptions, permissions and the
/// asynchronous dispatcher.
pub struct EventBus<O = AllowAll, I: IdGen = UuidIdGen> {
    registry: HandlerRegistry<I>,
    gate: Arc<PermissionGate<O>>,
    dispatcher: Dispatcher,
}

impl EventBus<AllowAll, UuidIdGen> {
    /// Bus that permits every publish and subscribe
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EventBusBuilder<AllowAll, UuidIdGen> {
        EventBusBuilder {
            oracle: AllowAll,
            id_gen: UuidIdGen,
            dispatcher: DispatcherConfig::default(),
        }
    }
}

impl Default for EventBus<AllowAll, UuidIdGen> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: PermissionOracle, I: IdGen> EventBus<O, I> {
    /// Subscribe `handler` to every topic matching one of `patterns`
    pub fn register<S: AsRef<str>>(
        &self,
        patterns: impl IntoIterator<Item = S>,
        principal: impl Into<Principal>,
        handler: impl EventHandler + 'static,
    ) -> Result<HandlerId, BusError> {
        let patterns = parse_patterns(patterns)?;
        Ok(self.register_handler(patterns, principal.into(), Arc::new(handler)))
    }

    /// Subscribe an already shared handler with parsed patterns
    pub fn register_handler(
        &self,
        patterns: Vec<TopicPattern>,
        principal: Principal,
        handler: Arc<dyn EventHandler>,
    ) -> HandlerId {
        self.registry.register(patterns, principal, handler)
    }

    /// Remove a subscription; unknown ids are ignored
    pub fn unregister(&self, id: &HandlerId) -> bool {
        self.registry.unregister(id)
    }

    /// Deliver synchronously on the calling thread
    pub fn send(
        &self,
        topic: &str,
        properties: Properties,
        principal: &Principal,
    ) -> Result<DeliveryReport, BusError> {
        let event = Event::parse(topic, properties)?;
        self.send_event(event, principal)
    }

    pub fn send_event(
        &self,
        event: Event,
        principal: &Principal,
    ) -> Result<DeliveryReport, BusError> {
        let job = self.prepare(event, principal)?;
        tracing::debug!(
            topic = %job.event().topic(),
            principal = %principal,
            targets = job.targets().len(),
            "send"
        );
        Ok(delivery::deliver(&job))
    }

    /// Queue for delivery on the dispatcher worker and return immediately
    pub fn post(
        &self,
        topic: &str,
        properties: Properties,
        principal: &Principal,
    ) -> Result<(), BusError> {
        let event = Event::parse(topic, properties)?;
        self.post_event(event, principal)
    }

    pub fn post_event(&self, event: Event, principal: &Principal) -> Result<(), BusError> {
        let job = self.prepare(event, principal)?;
        tracing::debug!(
            topic = %job.event().topic(),
            principal = %principal,
            targets = job.targets().len(),
            "post"
        );
        self.dispatcher.enqueue(job)
    }

    /// Authorize the publish, then freeze the permitted targets into a job
    fn prepare(&self, event: Event, principal: &Principal) -> Result<DeliveryJob, BusError> {
        let topic = event.topic();
        if !self.gate.can_publish(principal, topic) {
            return Err(BusError::PermissionDenied {
                principal: principal.clone(),
                topic: topic.clone(),
            });
        }

        let targets = self
            .registry
            .resolve(topic)
            .into_iter()
            .filter(|sub| {
                let allowed = self.gate.can_subscribe(&sub.principal, topic);
                if !allowed {
                    tracing::debug!(
                        handler = %sub.id,
                        principal = %sub.principal,
                        topic = %topic,
                        "subscriber not permitted, skipping"
                    );
                }
                allowed
            })
            .collect();

        Ok(DeliveryJob::new(event, targets))
    }

    /// Wait until every posted event has been delivered
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.dispatcher.wait_idle(timeout)
    }

    pub fn subscription_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &HandlerRegistry<I> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn gate(&self) -> &PermissionGate<O> {
        &self.gate
    }
}

impl<O, I: IdGen> Clone for EventBus<O, I> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            gate: Arc::clone(&self.gate),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

/// Assembles an [`EventBus`] from its collaborators
pub struct EventBusBuilder<O, I> {
    oracle: O,
    id_gen: I,
    dispatcher: DispatcherConfig,
}

impl<O: PermissionOracle, I: IdGen> EventBusBuilder<O, I> {
    pub fn oracle<O2: PermissionOracle>(self, oracle: O2) -> EventBusBuilder<O2, I> {
        EventBusBuilder {
            oracle,
            id_gen: self.id_gen,
            dispatcher: self.dispatcher,
        }
    }

    pub fn id_gen<I2: IdGen>(self, id_gen: I2) -> EventBusBuilder<O, I2> {
        EventBusBuilder {
            oracle: self.oracle,
            id_gen,
            dispatcher: self.dispatcher,
        }
    }

    pub fn dispatcher_config(mut self, config: DispatcherConfig) -> Self {
        self.dispatcher = config;
        self
    }

    pub fn build(self) -> EventBus<O, I> {
        EventBus {
            registry: HandlerRegistry::with_id_gen(self.id_gen),
            gate: Arc::new(PermissionGate::new(self.oracle)),
            dispatcher: Dispatcher::new(self.dispatcher),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
