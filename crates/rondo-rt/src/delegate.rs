// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Sub-task delegation.
//!
//! A delegating routine owns its sub-routine and forwards each step to
//! it. Every suspension of the sub-routine surfaces as a suspension of
//! the delegating routine. When the sub-routine completes, the
//! delegating routine carries on within the same step, so the scheduler
//! cannot tell delegation apart from inline suspension points.

use crate::context::Context;
use crate::error::BoxError;
use crate::routine::Routine;
use crate::task::Step;

/// Owned sub-routine being forwarded to.
///
/// Usable as a field inside a hand-written state machine (call
/// [`Delegate::forward`] and return early on `Step::Suspended`) or as a
/// routine of its own, for a task whose whole body is the delegation.
pub struct Delegate<R> {
    /// `None` once the sub-routine has completed; it is dropped right away.
    sub: Option<R>,
}

impl<R: Routine> Delegate<R> {
    pub fn new(sub: R) -> Self {
        Self { sub: Some(sub) }
    }

    /// Step the sub-routine once.
    ///
    /// `Step::Suspended` must be passed up unchanged. `Step::Completed`
    /// means the delegation point has been passed; later calls keep
    /// returning `Completed` without touching the finished sub-routine.
    pub fn forward(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        let Some(sub) = self.sub.as_mut() else {
            return Ok(Step::Completed);
        };
        let step = sub.step(cx)?;
        if step == Step::Completed {
            self.sub = None;
        }
        Ok(step)
    }

    pub fn is_done(&self) -> bool {
        self.sub.is_none()
    }
}

impl<R: Routine> Routine for Delegate<R> {
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        self.forward(cx)
    }
}

/// Sequential composition: run `A` to completion, then `B`.
///
/// Built with [`RoutineExt::then`](crate::routine::RoutineExt::then).
pub struct Chain<A, B> {
    first: Delegate<A>,
    second: B,
}

impl<A: Routine, B: Routine> Chain<A, B> {
    pub(crate) fn new(first: A, second: B) -> Self {
        Self {
            first: Delegate::new(first),
            second,
        }
    }
}

impl<A: Routine, B: Routine> Routine for Chain<A, B> {
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        if !self.first.is_done() && self.first.forward(cx)? == Step::Suspended {
            return Ok(Step::Suspended);
        }
        self.second.step(cx)
    }
}
