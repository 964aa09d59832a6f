// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Simulated I/O.
//!
//! No reactor, no timers. `SimulatedIo` stands in for an operation that
//! waits on something external: it suspends until a deadline has passed
//! and then completes with a transformed result. `block_for` is the
//! blocking flavour, for stages that model a synchronous wait.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::context::Context;
use crate::error::BoxError;
use crate::routine::Routine;
use crate::task::Step;

/// How long a simulated operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    Fixed(Duration),
    /// Pseudo-random duration in `[0, max)`, fixed by `seed`.
    Jitter { max: Duration, seed: u64 },
}

impl Delay {
    pub const ZERO: Delay = Delay::Fixed(Duration::ZERO);

    pub fn duration(&self) -> Duration {
        match *self {
            Delay::Fixed(d) => d,
            Delay::Jitter { max, seed } => {
                let max_nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
                if max_nanos == 0 {
                    return Duration::ZERO;
                }
                // xorshift never leaves zero.
                let mut state = seed.wrapping_add(0x9E3779B97F4A7C15) | 1;
                Duration::from_nanos(xorshift64(&mut state) % max_nanos)
            }
        }
    }
}

fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

/// Block the thread for the delay. Every other task waits too.
pub fn block_for(delay: Delay) {
    let d = delay.duration();
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}

/// Result slot shared between a `SimulatedIo` task and whoever wants the
/// result once it completes.
pub struct IoOutput<T> {
    inner: Rc<RefCell<Option<T>>>,
}

impl<T> IoOutput<T> {
    fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }

    fn set(&self, value: T) {
        *self.inner.borrow_mut() = Some(value);
    }

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().is_some()
    }

    pub fn take(&self) -> Option<T> {
        self.inner.borrow_mut().take()
    }
}

impl<T> Clone for IoOutput<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A routine that waits out a delay and then completes with
/// `transform(input)`.
///
/// The first resume starts the clock and suspends. Every later resume
/// before the deadline suspends again; the first one after it runs the
/// transform. A transform error fails the task and leaves the output empty.
///
/// The wait is polled, never slept. Other queued tasks take their turns in
/// the meantime, but when a `SimulatedIo` is the only task queued the run
/// loop busy-waits, resuming it back to back until the deadline passes.
pub struct SimulatedIo<I, O, F> {
    /// Taken when the transform runs.
    pending: Option<(I, F)>,
    delay: Duration,
    deadline: Option<Instant>,
    output: IoOutput<O>,
}

impl<I, O, F> SimulatedIo<I, O, F>
where
    F: FnOnce(I) -> Result<O, BoxError>,
{
    pub fn new(input: I, delay: Delay, transform: F) -> (Self, IoOutput<O>) {
        let output = IoOutput::new();
        let io = Self {
            pending: Some((input, transform)),
            delay: delay.duration(),
            deadline: None,
            output: output.clone(),
        };
        (io, output)
    }
}

impl<I, O, F> Routine for SimulatedIo<I, O, F>
where
    F: FnOnce(I) -> Result<O, BoxError>,
{
    fn step(&mut self, _cx: &mut Context<'_>) -> Result<Step, BoxError> {
        let deadline = match self.deadline {
            Some(deadline) => deadline,
            None => {
                self.deadline = Some(Instant::now() + self.delay);
                return Ok(Step::Suspended);
            }
        };
        if Instant::now() < deadline {
            return Ok(Step::Suspended);
        }
        if let Some((input, transform)) = self.pending.take() {
            self.output.set(transform(input)?);
        }
        Ok(Step::Completed)
    }
}
