// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous dispatcher: FIFO job queue drained by one on-demand worker
//!
//! The worker thread is created by the first `enqueue` that finds no worker
//! running, and exits after waiting `idle_timeout` on an empty queue. Both
//! decisions are made under the same mutex, so a job enqueued while the
//! worker is deciding to exit is either seen by that worker or causes a new
//! one to be spawned. At most one worker exists at any time, and jobs are
//! delivered one after another in enqueue order.

use crate::delivery;
use crate::error::BusError;
use crate::job::DeliveryJob;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Dispatcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// How long an idle worker waits for new jobs before exiting
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Duration,
    /// Name given to the worker thread
    pub thread_name: String,
}

impl DispatcherConfig {
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30),
            thread_name: "ea-dispatch".to_string(),
        }
    }
}

/// Worker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Absent,
    Running,
}

#[derive(Debug)]
struct DispatchState {
    queue: VecDeque<DeliveryJob>,
    worker: WorkerState,
    /// A job has been dequeued and is being delivered
    in_flight: bool,
    spawned: u64,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<DispatchState>,
    job_ready: Condvar,
    idle: Condvar,
    config: DispatcherConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Queue of delivery jobs plus the worker that drains it
#[derive(Debug, Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(DispatchState {
                    queue: VecDeque::new(),
                    worker: WorkerState::Absent,
                    in_flight: false,
                    spawned: 0,
                }),
                job_ready: Condvar::new(),
                idle: Condvar::new(),
                config,
            }),
        }
    }

    /// Append a job, starting a worker if none is running. Never blocks on
    /// delivery.
    pub fn enqueue(&self, job: DeliveryJob) -> Result<(), BusError> {
        let mut state = self.shared.lock();
        state.queue.push_back(job);

        if state.worker == WorkerState::Absent {
            let shared = Arc::clone(&self.shared);
            let spawned = thread::Builder::new()
                .name(self.shared.config.thread_name.clone())
                .spawn(move || run_worker(shared));

            match spawned {
                Ok(_) => {
                    state.worker = WorkerState::Running;
                    state.spawned += 1;
                    tracing::info!(
                        thread = %self.shared.config.thread_name,
                        generation = state.spawned,
                        "dispatcher worker started"
                    );
                }
                Err(e) => {
                    state.queue.pop_back();
                    tracing::error!(error = %e, "failed to spawn dispatcher worker");
                    return Err(BusError::WorkerSpawn(e));
                }
            }
        }

        drop(state);
        self.shared.job_ready.notify_one();
        Ok(())
    }

    /// Whether a worker thread currently exists
    pub fn is_worker_running(&self) -> bool {
        self.shared.lock().worker == WorkerState::Running
    }

    /// Jobs waiting to be delivered, not counting one in flight
    pub fn pending(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Number of worker threads started over the dispatcher's lifetime
    pub fn workers_spawned(&self) -> u64 {
        self.shared.lock().spawned
    }

    /// Block until the queue is drained and no job is in flight.
    /// Returns false if `timeout` elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let state = self.shared.lock();
        let (_state, result) = self
            .shared
            .idle
            .wait_timeout_while(state, timeout, |s| !s.queue.is_empty() || s.in_flight)
            .unwrap_or_else(|e| e.into_inner());
        !result.timed_out()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.shared.config
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

fn run_worker(shared: Arc<Shared>) {
    let idle_timeout = shared.config.idle_timeout;
    let mut state = shared.lock();

    loop {
        if let Some(job) = state.queue.pop_front() {
            state.in_flight = true;
            drop(state);

            let report = delivery::deliver(&job);
            tracing::trace!(
                topic = %job.event().topic(),
                delivered = report.delivered,
                failed = report.failures.len(),
                "async delivery complete"
            );

            state = shared.lock();
            state.in_flight = false;
            if state.queue.is_empty() {
                shared.idle.notify_all();
            }
            continue;
        }

        let (guard, wait) = shared
            .job_ready
            .wait_timeout(state, idle_timeout)
            .unwrap_or_else(|e| e.into_inner());
        state = guard;

        if wait.timed_out() && state.queue.is_empty() {
            state.worker = WorkerState::Absent;
            tracing::info!("dispatcher worker idle, exiting");
            return;
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
