// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Task representation.
//!
//! A `Task` wraps a boxed [`Routine`] together with its identity and
//! lifecycle state. The routine owns its resume position; the task only
//! tracks whether another step is allowed.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::context::Context;
use crate::error::Error;
use crate::routine::Routine;

/// Unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TaskId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl TaskId {
    pub(crate) fn next() -> Self {
        TaskId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Step {
    /// Reached a suspension point; resume again later.
    Suspended,
    /// Ran off the end of its logic.
    Completed,
}

/// Task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TaskState {
    /// Created, never resumed.
    Ready,
    /// Inside `resume`.
    Running,
    /// Parked at a suspension point.
    Suspended,
    /// Finished normally.
    Completed,
    /// Finished because a step returned an error.
    Failed,
}

impl TaskState {
    /// Completed or failed. No further steps are allowed.
    pub fn is_finished(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// A schedulable unit of cooperative work.
pub struct Task {
    id: TaskId,
    name: Cow<'static, str>,
    state: TaskState,
    resumes: u64,
    routine: Box<dyn Routine>,
    /// Tasks created through `Context::spawn` during the last step.
    spawned: Vec<Task>,
}

impl Task {
    pub fn new<R: Routine + 'static>(routine: R) -> Self {
        Self::named("task", routine)
    }

    pub fn named<R: Routine + 'static>(name: impl Into<Cow<'static, str>>, routine: R) -> Self {
        Task {
            id: TaskId::next(),
            name: name.into(),
            state: TaskState::Ready,
            resumes: 0,
            routine: Box::new(routine),
            spawned: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Number of steps run so far.
    pub fn resumes(&self) -> u64 {
        self.resumes
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Run one step: from the current position to the next suspension
    /// point or to the end of the routine.
    ///
    /// A finished task is never stepped again; resuming it returns
    /// [`Error::TaskCompleted`]. A routine error marks the task failed
    /// and comes back as [`Error::TaskFailed`].
    pub fn resume(&mut self) -> Result<Step, Error> {
        if self.state.is_finished() {
            return Err(Error::TaskCompleted {
                id: self.id,
                name: self.name.to_string(),
            });
        }

        self.state = TaskState::Running;
        self.resumes += 1;

        let mut cx = Context::new(self.id, &mut self.spawned);
        match self.routine.step(&mut cx) {
            Ok(step) => {
                self.state = match step {
                    Step::Suspended => TaskState::Suspended,
                    Step::Completed => TaskState::Completed,
                };
                trace!(task = %self.id, name = %self.name, resumes = self.resumes, ?step, "step");
                Ok(step)
            }
            Err(source) => {
                self.state = TaskState::Failed;
                Err(Error::TaskFailed {
                    id: self.id,
                    name: self.name.to_string(),
                    source,
                })
            }
        }
    }

    /// Drain the tasks spawned during previous steps.
    pub fn take_spawned(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.spawned)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("resumes", &self.resumes)
            .finish()
    }
}
