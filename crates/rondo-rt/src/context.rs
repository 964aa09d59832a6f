// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Per-step context.
//!
//! Handed to every `Routine::step` call. There is no ambient "current
//! task"; whatever a step needs to know about its surroundings comes
//! through here.

use crate::error::Error;
use crate::task::{Task, TaskId};

pub struct Context<'a> {
    id: TaskId,
    spawned: &'a mut Vec<Task>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(id: TaskId, spawned: &'a mut Vec<Task>) -> Self {
        Self { id, spawned }
    }

    /// Id of the task being stepped.
    pub fn task_id(&self) -> TaskId {
        self.id
    }

    /// Create a new task from inside a step.
    ///
    /// The task joins the tail of the ready queue after the current turn
    /// ends, so it never runs before the spawning step returns. Finished
    /// tasks are refused with `Error::TaskCompleted`.
    pub fn spawn(&mut self, task: Task) -> Result<TaskId, Error> {
        let id = task.id();
        if task.is_finished() {
            return Err(Error::TaskCompleted {
                id,
                name: task.name().to_string(),
            });
        }
        self.spawned.push(task);
        Ok(id)
    }
}
