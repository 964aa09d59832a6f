// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `rondo echo`: the echo server's request path without a socket.
//!
//! Every message gets one task: a simulated I/O wait that upper-cases the
//! message, chained to a step that "sends it back" once the result is in.

use std::cell::RefCell;
use std::process;
use std::rc::Rc;
use std::time::Duration;

use rondo_rt::io::{Delay, SimulatedIo};
use rondo_rt::{from_fn, BoxError, RoutineExt, Scheduler, Step, Task};
use serde_json::{json, Map};
use tracing::{debug, info};

use crate::options::{Format, Options};
use crate::output;

const DEFAULT_DELAY_MS: u64 = 100;

pub fn cmd_echo(opts: &Options) {
    if opts.positional.is_empty() {
        eprintln!("Usage: rondo echo [options] <message>...");
        process::exit(1);
    }

    let delay = Delay::Fixed(
        opts.delay
            .unwrap_or(Duration::from_millis(DEFAULT_DELAY_MS)),
    );
    let quiet = opts.format == Format::Json;
    info!(messages = opts.positional.len(), ?delay, "starting echo");

    let sched = Scheduler::builder()
        .failure_policy(opts.policy)
        .record_trace(opts.trace || quiet)
        .build();
    let replies = Rc::new(RefCell::new(Vec::new()));

    let result = opts
        .positional
        .iter()
        .try_for_each(|message| {
            if !quiet {
                println!("Data received: {}", output::quoted(message));
            }
            let task = echo_task(message, delay, opts.fail_on.clone(), replies.clone(), quiet);
            sched.register(task).map(drop)
        })
        .and_then(|()| sched.run());
    let mut extra = Map::new();
    extra.insert("replies".into(), json!(*replies.borrow()));
    super::finish("Echo", result, opts, extra);
}

fn echo_task(
    message: &str,
    delay: Delay,
    fail_on: Option<String>,
    replies: Rc<RefCell<Vec<String>>>,
    quiet: bool,
) -> Task {
    let (io, reply) = SimulatedIo::new(message.to_string(), delay, move |m: String| -> Result<String, BoxError> {
        if fail_on.as_deref() == Some(m.as_str()) {
            return Err(format!("connection reset while handling {:?}", m).into());
        }
        Ok(m.to_uppercase())
    });

    let send_back = from_fn(move |cx| {
        if let Some(text) = reply.take() {
            debug!(task = %cx.task_id(), "reply ready");
            if !quiet {
                println!("Sending back: {}", output::quoted(&text));
            }
            replies.borrow_mut().push(text);
        }
        Ok(Step::Completed)
    });

    Task::named(format!("echo:{}", message), io.then(send_back))
}
