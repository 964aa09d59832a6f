// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `rondo demo`: four staged tasks interleaved on one scheduler.
//!
//! part1, part2 and part3 have 2, 3 and 5 stages. part4 delegates its
//! whole body to a fresh part1. Every stage blocks for a jittered
//! simulated I/O wait before suspending.

use std::time::Duration;

use rondo_rt::io::{block_for, Delay};
use rondo_rt::{Delegate, Error, Scheduler, Stages, Task, TaskId};
use serde_json::Map;
use tracing::info;

use crate::options::{Format, Options};
use crate::output;

const DEFAULT_DELAY_MS: u64 = 100;

pub fn cmd_demo(opts: &Options) {
    let max = opts
        .delay
        .unwrap_or(Duration::from_millis(DEFAULT_DELAY_MS));
    let quiet = opts.format == Format::Json;
    info!(max_delay_ms = max.as_millis() as u64, "starting demo");

    let sched = Scheduler::builder()
        .failure_policy(opts.policy)
        .record_trace(opts.trace || quiet)
        .build();

    let result = register_parts(&sched, max, quiet).and_then(|_| sched.run());
    super::finish("Demo", result, opts, Map::new());
}

/// Queue part1 to part4 in order and return their ids.
fn register_parts(
    sched: &Scheduler,
    max: Duration,
    quiet: bool,
) -> Result<[TaskId; 4], Error> {
    Ok([
        sched.register(Task::named("part1", staged("part1", 2, max, quiet)))?,
        sched.register(Task::named("part2", staged("part2", 3, max, quiet)))?,
        sched.register(Task::named("part3", staged("part3", 5, max, quiet)))?,
        sched.register(Task::named(
            "part4",
            Delegate::new(staged("part1", 2, max, quiet)),
        ))?,
    ])
}

/// `count` stages, each printing its position and then waiting.
pub(crate) fn staged(label: &'static str, count: u32, max: Duration, quiet: bool) -> Stages {
    (1..=count).fold(Stages::new(), |stages, n| {
        stages.stage(move |cx| {
            let id = cx.task_id();
            if !quiet {
                println!("{:<8} {}.{}", id.to_string(), output::task_name(label), n);
            }
            block_for(Delay::Jitter {
                max,
                seed: (id.as_u64() << 8) | u64::from(n),
            });
            Ok(())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_rt::Outcome;

    #[test]
    fn demo_schedule_shape() {
        let sched = Scheduler::builder().record_trace(true).build();
        let [p1, p2, p3, p4] = register_parts(&sched, Duration::ZERO, true).unwrap();

        let report = sched.run().unwrap();
        assert_eq!(report.turns, 3 + 4 + 6 + 3);
        assert_eq!(report.last_finished(), Some(p3));

        let done: Vec<_> = report
            .trace
            .iter()
            .filter(|t| t.outcome == Outcome::Completed)
            .map(|t| t.task)
            .collect();
        assert_eq!(done, vec![p1, p4, p2, p3]);
    }
}
