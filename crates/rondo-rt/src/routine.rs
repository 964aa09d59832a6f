// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Routines: the logic a task runs.
//!
//! A routine is an explicit state machine. Each `step` call runs from the
//! saved position to the next suspension point (returning
//! `Step::Suspended`) or to the end (returning `Step::Completed`). The
//! position lives in the routine's own fields.

use std::collections::VecDeque;

use crate::context::Context;
use crate::delegate::Chain;
use crate::error::BoxError;
use crate::task::Step;

/// Task-definition contract. Anything implementing it can be scheduled.
pub trait Routine {
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError>;
}

impl<R: Routine + ?Sized> Routine for Box<R> {
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        (**self).step(cx)
    }
}

impl<R: Routine + ?Sized> Routine for &mut R {
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        (**self).step(cx)
    }
}

/// Combinators available on every routine.
pub trait RoutineExt: Routine + Sized {
    /// Run `self` to completion, then continue with `next` in the same step.
    fn then<B: Routine>(self, next: B) -> Chain<Self, B> {
        Chain::new(self, next)
    }
}

impl<R: Routine> RoutineExt for R {}

/// Routine backed by a closure. See [`from_fn`].
pub struct FromFn<F> {
    f: F,
}

/// Build a routine from a closure called once per step.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&mut Context<'_>) -> Result<Step, BoxError>,
{
    FromFn { f }
}

impl<F> Routine for FromFn<F>
where
    F: FnMut(&mut Context<'_>) -> Result<Step, BoxError>,
{
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        (self.f)(cx)
    }
}

/// Suspends a fixed number of times, then completes.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(suspensions: u32) -> Self {
        Self {
            remaining: suspensions,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Routine for Countdown {
    fn step(&mut self, _cx: &mut Context<'_>) -> Result<Step, BoxError> {
        if self.remaining == 0 {
            return Ok(Step::Completed);
        }
        self.remaining -= 1;
        Ok(Step::Suspended)
    }
}

type Stage = Box<dyn FnOnce(&mut Context<'_>) -> Result<(), BoxError>>;

/// A straight-line routine: each resume runs the next stage and then
/// suspends. The resume after the last stage completes the routine, so
/// `n` stages take `n + 1` resumes.
#[derive(Default)]
pub struct Stages {
    pending: VecDeque<Stage>,
}

impl Stages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn stage<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Context<'_>) -> Result<(), BoxError> + 'static,
    {
        self.pending.push_back(Box::new(f));
        self
    }

    /// Stages not yet run.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Routine for Stages {
    fn step(&mut self, cx: &mut Context<'_>) -> Result<Step, BoxError> {
        match self.pending.pop_front() {
            Some(stage) => {
                stage(cx)?;
                Ok(Step::Suspended)
            }
            None => Ok(Step::Completed),
        }
    }
}
