// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Round-robin cooperative scheduler.
//!
//! One ready queue, one logical thread. Each turn pops the front task,
//! resumes it exactly once and re-queues it at the tail if it suspended.
//! `run` repeats turns until the queue is empty.
//!
//! All methods take `&self` so a task holding a shared handle to its own
//! scheduler can register more work. Such registrations, like
//! `Context::spawn`, are parked until the current turn ends. Calling
//! `run`, `turn` or `resume` from inside a task is rejected with
//! `Error::Reentrant`.

use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};

use crate::builder::{Builder, FailurePolicy};
use crate::error::Error;
use crate::queue::ReadyQueue;
use crate::report::{Outcome, RunReport, TaskFailure, Turn};
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    /// Inside `run`, `turn` or `resume`.
    Running,
}

pub struct Scheduler {
    queue: RefCell<ReadyQueue>,
    /// Tasks registered while a turn was in progress.
    incoming: RefCell<Vec<Task>>,
    state: Cell<SchedulerState>,
    /// Turns taken over the scheduler's lifetime.
    turns: Cell<u64>,
    failures: RefCell<Vec<TaskFailure>>,
    trace: RefCell<Vec<Turn>>,
    config: Builder,
}

/// Puts the scheduler back to `Idle` on every exit path, errors and
/// panics included.
struct RunningGuard<'a> {
    state: &'a Cell<SchedulerState>,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.state.set(SchedulerState::Idle);
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Builder::new().build()
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn with_config(config: Builder) -> Self {
        Self {
            queue: RefCell::new(ReadyQueue::new()),
            incoming: RefCell::new(Vec::new()),
            state: Cell::new(SchedulerState::Idle),
            turns: Cell::new(0),
            failures: RefCell::new(Vec::new()),
            trace: RefCell::new(Vec::new()),
            config,
        }
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.config.failure_policy
    }

    /// Append a task to the tail of the ready queue. Nothing runs.
    ///
    /// While a turn is in progress the task is held back and queued once
    /// the turn ends. A task that has already completed or failed is
    /// refused with `Error::TaskCompleted` and nothing is queued.
    pub fn register(&self, task: Task) -> Result<TaskId, Error> {
        let id = task.id();
        if task.is_finished() {
            return Err(Error::TaskCompleted {
                id,
                name: task.name().to_string(),
            });
        }
        debug!(task = %id, name = task.name(), "registered");
        if self.is_running() {
            self.incoming.borrow_mut().push(task);
        } else {
            self.queue.borrow_mut().push(task);
        }
        Ok(id)
    }

    /// Drive every registered task to completion.
    ///
    /// Returns once the queue is empty. Under `FailurePolicy::Abort` the
    /// first task failure is returned instead; the remaining tasks keep
    /// their queue order and a later `run` picks them up again. Turns the
    /// aborted run traced are discarded.
    pub fn run(&self) -> Result<RunReport, Error> {
        let _guard = self.enter()?;
        let first_turn = self.turns.get();
        let first_trace = self.trace.borrow().len();
        info!(tasks = self.len(), "run started");

        let mut completed = 0;
        loop {
            let next = self.queue.borrow_mut().pop();
            let Some(task) = next else {
                break;
            };
            match self.drive(task) {
                Ok(turn) if turn.outcome == Outcome::Completed => completed += 1,
                Ok(_) => {}
                Err(err) => {
                    self.trace.borrow_mut().truncate(first_trace);
                    return Err(err);
                }
            }
        }

        let report = RunReport {
            turns: self.turns.get() - first_turn,
            completed,
            failures: self.take_failures(),
            trace: self.take_trace(),
        };
        info!(
            turns = report.turns,
            completed = report.completed,
            failed = report.failures.len(),
            "run finished"
        );
        Ok(report)
    }

    /// Take a single turn. Returns `None` when there is nothing queued.
    pub fn turn(&self) -> Result<Option<Turn>, Error> {
        let _guard = self.enter()?;
        let next = self.queue.borrow_mut().pop();
        match next {
            Some(task) => self.drive(task).map(Some),
            None => Ok(None),
        }
    }

    /// Resume one specific queued task out of turn.
    ///
    /// If it suspends it goes to the tail like after any other turn.
    pub fn resume(&self, id: TaskId) -> Result<Turn, Error> {
        let _guard = self.enter()?;
        let task = self
            .queue
            .borrow_mut()
            .remove(id)
            .ok_or(Error::UnknownTask { id })?;
        self.drive(task)
    }

    /// Failures isolated since the last `run` finished.
    pub fn take_failures(&self) -> Vec<TaskFailure> {
        std::mem::take(&mut *self.failures.borrow_mut())
    }

    /// Turns recorded since the last `run` finished. Only filled when
    /// trace recording is on.
    pub fn take_trace(&self) -> Vec<Turn> {
        std::mem::take(&mut *self.trace.borrow_mut())
    }

    /// Tasks still tracked: queued plus held back.
    pub fn len(&self) -> usize {
        self.queue.borrow().len() + self.incoming.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty() && self.incoming.borrow().is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.queue.borrow().contains(id) || self.incoming.borrow().iter().any(|t| t.id() == id)
    }

    /// Queued task ids, front first.
    pub fn queued(&self) -> Vec<TaskId> {
        self.queue.borrow().ids()
    }

    pub fn state(&self) -> SchedulerState {
        self.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state.get() == SchedulerState::Running
    }

    fn enter(&self) -> Result<RunningGuard<'_>, Error> {
        if self.is_running() {
            return Err(Error::Reentrant);
        }
        self.state.set(SchedulerState::Running);
        Ok(RunningGuard { state: &self.state })
    }

    /// Resume a task that has already been taken off the queue, then put
    /// it and anything it created back.
    ///
    /// No queue borrow is held while the task runs.
    fn drive(&self, mut task: Task) -> Result<Turn, Error> {
        let result = task.resume();

        let seq = self.turns.get() + 1;
        self.turns.set(seq);

        // New work goes ahead of the task that created it.
        let spawned = task.take_spawned();
        let registered = std::mem::take(&mut *self.incoming.borrow_mut());
        {
            let mut queue = self.queue.borrow_mut();
            queue.push_batch(spawned);
            queue.push_batch(registered);
        }

        let id = task.id();
        let outcome = match result {
            Ok(step) => Outcome::from(step),
            Err(err @ Error::TaskFailed { .. }) => match self.config.failure_policy {
                FailurePolicy::Abort => {
                    warn!(task = %id, name = task.name(), error = %err, "task failed, aborting run");
                    return Err(err);
                }
                FailurePolicy::Isolate => {
                    warn!(task = %id, name = task.name(), error = %err, "task failed, continuing");
                    self.failures.borrow_mut().push(TaskFailure {
                        task: id,
                        name: task.name().to_string(),
                        error: err,
                    });
                    Outcome::Failed
                }
            },
            Err(err) => return Err(err),
        };

        let turn = Turn {
            seq,
            task: id,
            name: task.name().to_string(),
            outcome,
        };
        debug!(seq, task = %id, ?outcome, "turn");
        if self.config.record_trace {
            self.trace.borrow_mut().push(turn.clone());
        }

        match outcome {
            Outcome::Suspended => self.queue.borrow_mut().push(task),
            Outcome::Completed => debug!(task = %id, resumes = task.resumes(), "completed"),
            Outcome::Failed => {}
        }
        Ok(turn)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
