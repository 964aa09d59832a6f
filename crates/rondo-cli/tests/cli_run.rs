// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Integration tests for `rondo demo` and `rondo echo`.
//! Each test runs the built binary and checks its output and exit code.

use std::path::PathBuf;
use std::process::{Command, Output};

fn rondo_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rondo"))
}

fn rondo(args: &[&str]) -> Output {
    Command::new(rondo_binary())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RONDO_LOG")
        .output()
        .expect("failed to run rondo")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

#[test]
fn demo_interleaves_stages() {
    let out = rondo(&["demo", "--delay-ms", "0"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    let stage_lines: Vec<&str> = text
        .lines()
        .filter(|l| l.contains("part") && !l.contains("==="))
        .collect();
    // 2 + 3 + 5 + 2 stages print one line each.
    assert_eq!(stage_lines.len(), 12);
    assert!(stage_lines[0].ends_with("part1.1"));
    assert!(stage_lines[1].ends_with("part2.1"));
    assert!(stage_lines[2].ends_with("part3.1"));
    assert!(stage_lines[3].ends_with("part1.1"));
    assert!(stage_lines[4].ends_with("part1.2"));
    assert!(text.contains("Demo OK: 4 tasks, 16 turns"));
}

#[test]
fn demo_json_report() {
    let out = rondo(&["demo", "--delay-ms", "0", "--json"]);
    assert!(out.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("valid JSON");
    assert_eq!(report["ok"], true);
    assert_eq!(report["turns"], 16);
    assert_eq!(report["completed"], 4);

    let trace = report["trace"].as_array().expect("trace array");
    assert_eq!(trace.len(), 16);
    assert_eq!(trace[0]["name"], "part1");
    assert_eq!(trace[0]["outcome"], "suspended");
    assert_eq!(trace[15]["name"], "part3");
    assert_eq!(trace[15]["outcome"], "completed");
}

#[test]
fn demo_trace_table() {
    let out = rondo(&["demo", "--delay-ms", "0", "--trace"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Turns:"));
    assert_eq!(text.lines().filter(|l| l.ends_with("completed")).count(), 4);
}

#[test]
fn echo_sends_back_upper_case() {
    let out = rondo(&["echo", "--delay-ms", "1", "hello", "world"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Data received: \"hello\""));
    assert!(text.contains("Sending back: \"HELLO\""));
    assert!(text.contains("Sending back: \"WORLD\""));
}

#[test]
fn echo_abort_policy_fails_run() {
    let out = rondo(&["echo", "--delay-ms", "0", "--fail-on", "boom", "a", "boom", "c"]);
    assert_eq!(out.status.code(), Some(1));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("connection reset"));
    assert!(err.contains("Echo FAILED"));
}

#[test]
fn echo_isolate_policy_answers_the_rest() {
    let out = rondo(&[
        "echo", "--delay-ms", "0", "--policy", "isolate", "--fail-on", "boom", "a", "boom", "c",
        "--json",
    ]);
    assert_eq!(out.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("valid JSON");
    assert_eq!(report["ok"], false);
    assert_eq!(report["completed"], 2);
    assert_eq!(report["replies"], serde_json::json!(["A", "C"]));
    assert_eq!(report["failures"][0]["name"], "echo:boom");
}

#[test]
fn usage_errors() {
    assert_eq!(rondo(&["echo"]).status.code(), Some(1));
    assert_eq!(rondo(&["demo", "--policy", "retry"]).status.code(), Some(1));
    assert_eq!(rondo(&["frobnicate"]).status.code(), Some(1));
    assert!(rondo(&["help"]).status.success());

    let version = rondo(&["--version"]);
    assert!(stdout(&version).starts_with("rondo "));
}
