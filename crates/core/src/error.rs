// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event bus

use crate::id::HandlerId;
use crate::permission::Principal;
use crate::topic::{Topic, TopicError};
use thiserror::Error;

/// Errors surfaced to publishers and registrants
#[derive(Debug, Error)]
pub enum BusError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] TopicError),
    #[error("permission denied: {principal} may not publish to {topic}")]
    PermissionDenied { principal: Principal, topic: Topic },
    #[error("failed to start dispatcher worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

/// How a handler invocation went wrong
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerFailure {
    #[error("returned error: {0}")]
    Error(String),
    #[error("panicked: {0}")]
    Panic(String),
}

/// A single handler's failure to process an event
///
/// Recorded and logged by the delivery path, never propagated to the
/// publisher or to other handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("handler {handler} failed on {topic}: {cause}")]
pub struct HandlerDeliveryError {
    pub handler: HandlerId,
    pub topic: Topic,
    pub cause: HandlerFailure,
}
