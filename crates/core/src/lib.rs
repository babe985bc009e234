// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! ea-core: in-process topic event bus
//!
//! This crate provides:
//! - Hierarchical topics and wildcard patterns
//! - A handler registry with snapshot lookups
//! - Per-topic publish/subscribe permissions
//! - Synchronous `send` and asynchronous, ordered `post` delivery with
//!   per-handler fault isolation

pub mod bus;
pub mod config;
pub mod delivery;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod id;
pub mod job;
pub mod permission;
pub mod registry;
pub mod topic;

// Re-exports
pub use bus::{EventBus, EventBusBuilder};
pub use config::{BusConfig, ConfigError};
pub use delivery::DeliveryReport;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::{BusError, HandlerDeliveryError, HandlerFailure};
pub use event::{Event, EventBuilder, Properties};
pub use handler::{EventHandler, HandlerError};
pub use id::{HandlerId, IdGen, SequentialIdGen, UuidIdGen};
pub use job::DeliveryJob;
pub use permission::{
    AllowAll, Decision, PermissionGate, PermissionOracle, PolicyConfig, PolicyOracle, Principal,
    TopicAction, TracedOracle,
};
pub use registry::{HandlerRegistry, Subscription};
pub use topic::{Topic, TopicError, TopicPattern};
