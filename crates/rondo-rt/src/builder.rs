// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scheduler configuration.

use crate::scheduler::Scheduler;

/// What `run` does when a task's step returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it from `run`. The failed task
    /// is dropped; every other task stays queued in order.
    #[default]
    Abort,
    /// Drop the failed task, record the failure in the run report and keep
    /// going with the rest of the queue.
    Isolate,
}

#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) failure_policy: FailurePolicy,

    /// Keep one `Turn` per resume in the run report.
    ///
    /// Off by default: a long run accumulates one entry per step.
    pub(crate) record_trace: bool,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn record_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    pub fn build(self) -> Scheduler {
        Scheduler::with_config(self)
    }
}
