// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! What a scheduler run did.

use crate::error::Error;
use crate::task::{Step, TaskId};

/// How a single turn ended for the task that got it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// Re-queued at the tail.
    Suspended,
    /// Finished and dropped.
    Completed,
    /// Step returned an error; dropped.
    Failed,
}

impl From<Step> for Outcome {
    fn from(step: Step) -> Self {
        match step {
            Step::Suspended => Outcome::Suspended,
            Step::Completed => Outcome::Completed,
        }
    }
}

/// One resume performed by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Turn {
    /// Position of this turn in the scheduler's lifetime, starting at 1.
    pub seq: u64,
    pub task: TaskId,
    pub name: String,
    pub outcome: Outcome,
}

/// A task failure that was isolated instead of aborting the run.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: TaskId,
    pub name: String,
    /// Always `Error::TaskFailed`.
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Resumes performed during the run.
    pub turns: u64,
    /// Tasks that ran to completion during the run.
    pub completed: usize,
    pub failures: Vec<TaskFailure>,
    /// Every turn, in order. Empty unless trace recording is enabled.
    pub trace: Vec<Turn>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns taken by one task, in order.
    pub fn turns_of(&self, task: TaskId) -> impl Iterator<Item = &Turn> + '_ {
        self.trace.iter().filter(move |t| t.task == task)
    }

    /// Task of the last turn, i.e. the last task to leave the queue.
    pub fn last_finished(&self) -> Option<TaskId> {
        self.trace.last().map(|t| t.task)
    }
}
