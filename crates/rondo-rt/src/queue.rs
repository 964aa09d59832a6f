// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Ready queue.
//!
//! Plain FIFO over a `VecDeque`. The scheduler pops from the front and
//! re-queues suspended tasks at the back. Single-threaded: no locking.

use std::collections::VecDeque;

use crate::task::{Task, TaskId};

pub(crate) struct ReadyQueue {
    deque: VecDeque<Task>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            deque: VecDeque::new(),
        }
    }

    pub fn push(&mut self, task: Task) {
        debug_assert!(!self.contains(task.id()), "{} queued twice", task.id());
        self.deque.push_back(task);
    }

    pub fn push_batch(&mut self, tasks: Vec<Task>) {
        for task in tasks {
            self.push(task);
        }
    }

    /// Pop from the front.
    pub fn pop(&mut self) -> Option<Task> {
        self.deque.pop_front()
    }

    /// Take a specific task out of the queue, wherever it sits.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let pos = self.deque.iter().position(|t| t.id() == id)?;
        self.deque.remove(pos)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.deque.iter().any(|t| t.id() == id)
    }

    /// Queued ids, front first.
    pub fn ids(&self) -> Vec<TaskId> {
        self.deque.iter().map(Task::id).collect()
    }

    pub fn len(&self) -> usize {
        self.deque.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }
}
