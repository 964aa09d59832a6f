// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scheduler and task errors.

use thiserror::Error;

use crate::task::TaskId;

/// Error type returned by a routine's step.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The call is illegal in the current state (finished task, re-entrant run).
    InvalidState,
    /// The task is not tracked by the scheduler.
    UnregisteredTask,
    /// The task's own logic failed during a step.
    TaskExecutionFailure,
}

#[derive(Debug, Error)]
pub enum Error {
    /// Resume was called on a task that already completed or failed.
    #[error("{id} ({name}) has already finished and cannot be resumed")]
    TaskCompleted { id: TaskId, name: String },

    /// `run`, `turn` or `resume` was called while the scheduler was driving tasks.
    #[error("scheduler is already running")]
    Reentrant,

    #[error("{id} is not tracked by this scheduler")]
    UnknownTask { id: TaskId },

    #[error("{id} ({name}) failed: {source}")]
    TaskFailed {
        id: TaskId,
        name: String,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TaskCompleted { .. } | Error::Reentrant => ErrorKind::InvalidState,
            Error::UnknownTask { .. } => ErrorKind::UnregisteredTask,
            Error::TaskFailed { .. } => ErrorKind::TaskExecutionFailure,
        }
    }

    /// Id of the task the error is about, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Error::TaskCompleted { id, .. }
            | Error::UnknownTask { id }
            | Error::TaskFailed { id, .. } => Some(*id),
            Error::Reentrant => None,
        }
    }
}
