// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_usage() {
    println!(
        "{} {} - Cooperative round-robin scheduling, one step at a time",
        output::title("Rondo"),
        output::version(VERSION)
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("rondo"),
        output::arg("<command>"),
        output::arg("[options]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {}                 Interleave four staged tasks, one delegating", output::command("demo"));
    println!("  {} {}  Echo messages back upper-cased via simulated I/O", output::command("echo"), output::arg("<message>..."));
    println!("  {}                 Show this help", output::command("help"));
    println!("  {}              Show version", output::command("version"));

    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {} {}     Maximum simulated I/O wait per step (demo: jittered)", output::arg("--delay-ms"), output::arg("<n>"));
    println!("  {}              Print every scheduler turn after the run", output::arg("--trace"));
    println!("  {}               Output the run report as JSON", output::arg("--json"));
    println!("  {} {}   On task failure: stop (abort) or carry on (isolate)", output::arg("--policy"), output::arg("<p>"));
    println!("  {} {}   echo: fail the task handling this message", output::arg("--fail-on"), output::arg("<word>"));

    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}  Log level: error, warn, info, debug, trace (default warn)", output::arg("RONDO_LOG"));
    println!("  {}   Disable colors", output::arg("NO_COLOR"));
    println!("  {} Force colors", output::arg("FORCE_COLOR"));
}
