// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery jobs

use crate::event::Event;
use crate::id::HandlerId;
use crate::registry::Subscription;
use std::sync::Arc;

/// One event paired with the handlers it will be delivered to
///
/// The target list is resolved and permission-filtered once, at publish
/// time, and never changes afterwards.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    event: Event,
    targets: Arc<[Arc<Subscription>]>,
}

impl DeliveryJob {
    pub fn new(event: Event, targets: Vec<Arc<Subscription>>) -> Self {
        Self {
            event,
            targets: targets.into(),
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn targets(&self) -> &[Arc<Subscription>] {
        &self.targets
    }

    pub fn target_ids(&self) -> Vec<HandlerId> {
        self.targets.iter().map(|s| s.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
