// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rondo runtime: cooperative round-robin scheduling on one thread.
//!
//! Tasks are explicit state machines (`Routine`s) that run until they
//! suspend or complete. The scheduler resumes them one step at a time in
//! FIFO order and drops them once finished. No preemption, no
//! parallelism, no real I/O.
//!
//! Components:
//! - task     : Task, TaskId, TaskState, Step
//! - routine  : Routine trait and stock routines (closures, countdowns, stages)
//! - delegate : forwarding to owned sub-routines
//! - context  : per-step context (task id, dynamic spawning)
//! - scheduler: ready queue and run loop
//! - io       : simulated I/O with a deadline

pub mod builder;
pub mod context;
pub mod delegate;
pub mod error;
pub mod io;
mod queue;
pub mod report;
pub mod routine;
pub mod scheduler;
pub mod task;

pub use builder::{Builder, FailurePolicy};
pub use context::Context;
pub use delegate::{Chain, Delegate};
pub use error::{BoxError, Error, ErrorKind};
pub use report::{Outcome, RunReport, TaskFailure, Turn};
pub use routine::{from_fn, Countdown, Routine, RoutineExt, Stages};
pub use scheduler::{Scheduler, SchedulerState};
pub use task::{Step, Task, TaskId, TaskState};
