// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriber callbacks

use crate::event::Event;
use thiserror::Error;

/// Error returned by a handler that could not process an event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Wrap any error, keeping only its message
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Receives events delivered by the bus
///
/// `handle` may be called from the publisher's thread (`send`) or from the
/// dispatcher worker (`post`). Errors and panics are contained by the bus.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event) -> Result<(), HandlerError>;
}

impl<F> EventHandler for F
where
    F: Fn(&Event) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self(event)
    }
}
