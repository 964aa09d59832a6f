// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rondo CLI - runs task sets on the cooperative scheduler.

mod commands;
mod help;
mod options;
mod output;

use std::env;
use std::process;

use tracing::{warn, Level};

fn main() {
    output::init();
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        help::print_usage();
        return;
    }

    match args[1].as_str() {
        "demo" | "echo" => {
            let opts = match options::parse(&args[2..]) {
                Ok(opts) => opts,
                Err(e) => {
                    eprintln!("{}: {}", output::error_label(), e);
                    process::exit(1);
                }
            };
            if args[1] == "demo" {
                if !opts.positional.is_empty() {
                    eprintln!("Usage: rondo demo [options]");
                    process::exit(1);
                }
                commands::demo::cmd_demo(&opts);
            } else {
                commands::echo::cmd_echo(&opts);
            }
        }
        "help" | "--help" | "-h" => {
            help::print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("rondo {}", help::VERSION);
        }
        other => {
            eprintln!("{}: unknown command: {}", output::error_label(), other);
            help::print_usage();
            process::exit(1);
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
fn init_logging() {
    let requested = env::var("RONDO_LOG").ok();
    let level = requested
        .as_deref()
        .and_then(|v| v.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(v) = requested {
        if v.parse::<Level>().is_err() {
            warn!("ignoring invalid RONDO_LOG value {:?}", v);
        }
    }
}
