// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI command implementations.

pub mod demo;
pub mod echo;

use std::process;

use colored::Colorize;
use rondo_rt::{Error, RunReport};
use serde_json::{json, Map, Value};

use crate::options::{Format, Options};
use crate::output;

/// Print the outcome of a run and exit non-zero if any task failed.
///
/// `extra` is merged into the JSON report.
pub(crate) fn finish(phase: &str, result: Result<RunReport, Error>, opts: &Options, extra: Map<String, Value>) {
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            match opts.format {
                Format::Json => print_json(json!({ "ok": false, "error": err.to_string() })),
                Format::Human => {
                    eprintln!("{}: {}", output::error_label(), err);
                    eprintln!("\n{}", output::banner_fail(phase, 1));
                }
            }
            process::exit(1);
        }
    };

    match opts.format {
        Format::Json => {
            let failures: Vec<Value> = report
                .failures
                .iter()
                .map(|f| json!({ "task": f.task, "name": f.name, "error": f.error.to_string() }))
                .collect();
            let mut body = Map::new();
            body.insert("ok".into(), json!(report.is_clean()));
            body.insert("turns".into(), json!(report.turns));
            body.insert("completed".into(), json!(report.completed));
            body.insert("failures".into(), Value::Array(failures));
            body.insert("trace".into(), json!(report.trace));
            body.extend(extra);
            print_json(Value::Object(body));
        }
        Format::Human => {
            if opts.trace {
                print_trace(&report);
            }
            for failure in &report.failures {
                eprintln!("{}: {}", output::warning_label(), failure.error);
            }
            println!();
            if report.is_clean() {
                let detail = format!("{} tasks, {} turns", report.completed, report.turns);
                println!("{}", output::banner_ok(phase, &detail));
            } else {
                eprintln!("{}", output::banner_fail(phase, report.failures.len()));
            }
        }
    }

    if !report.is_clean() {
        process::exit(1);
    }
}

fn print_trace(report: &RunReport) {
    println!();
    println!("{}", output::section_header("Turns:"));
    println!("{}", output::separator(40));
    for turn in &report.trace {
        println!(
            "{:>4}  {:<8} {:<14} {}",
            turn.seq.to_string().dimmed(),
            turn.task.to_string(),
            output::task_name(&turn.name),
            output::outcome(turn.outcome)
        );
    }
    println!("{}", output::separator(40));
}

fn print_json(value: Value) {
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("{}: cannot serialize report: {}", output::error_label(), e);
            process::exit(1);
        }
    }
}
