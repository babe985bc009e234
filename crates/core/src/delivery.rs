// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fault-isolated execution of delivery jobs
//!
//! Every handler call is wrapped so that an error or a panic is caught,
//! logged and recorded, and delivery moves on to the next handler.

use crate::error::{HandlerDeliveryError, HandlerFailure};
use crate::event::Event;
use crate::job::DeliveryJob;
use crate::registry::Subscription;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// What happened while delivering one job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Handlers that returned successfully
    pub delivered: usize,
    pub failures: Vec<HandlerDeliveryError>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Deliver a job on the current thread, in target order
pub fn deliver(job: &DeliveryJob) -> DeliveryReport {
    let event = job.event();
    let mut report = DeliveryReport::default();

    for subscription in job.targets() {
        match invoke(subscription, event) {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                tracing::warn!(
                    handler = %err.handler,
                    topic = %err.topic,
                    error = %err.cause,
                    "handler failed"
                );
                report.failures.push(err);
            }
        }
    }

    report
}

/// Call one handler, converting errors and panics into a delivery error
pub fn invoke(subscription: &Subscription, event: &Event) -> Result<(), HandlerDeliveryError> {
    tracing::trace!(handler = %subscription.id, topic = %event.topic(), "delivering");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| subscription.handler.handle(event)));

    let cause = match outcome {
        Ok(Ok(())) => return Ok(()),
        Ok(Err(err)) => HandlerFailure::Error(err.to_string()),
        Err(payload) => HandlerFailure::Panic(panic_message(payload.as_ref())),
    };

    Err(HandlerDeliveryError {
        handler: subscription.id.clone(),
        topic: event.topic().clone(),
        cause,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
