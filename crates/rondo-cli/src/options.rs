// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command-line options shared by the run commands.

use std::time::Duration;

use rondo_rt::FailurePolicy;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Explicit `--delay-ms`; each command has its own default.
    pub delay: Option<Duration>,
    pub trace: bool,
    pub format: Format,
    pub policy: FailurePolicy,
    pub fail_on: Option<String>,
    /// Non-flag arguments, in order.
    pub positional: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delay: None,
            trace: false,
            format: Format::Human,
            policy: FailurePolicy::Abort,
            fail_on: None,
            positional: Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("unknown option `{0}`")]
    UnknownFlag(String),
    #[error("option `{0}` expects a value")]
    MissingValue(&'static str),
    #[error("invalid value `{value}` for `{flag}`: {reason}")]
    InvalidValue {
        flag: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub fn parse(args: &[String]) -> Result<Options, ArgError> {
    let mut opts = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--trace" => opts.trace = true,
            "--json" => opts.format = Format::Json,
            "--delay-ms" => {
                let value = iter.next().ok_or(ArgError::MissingValue("--delay-ms"))?;
                let ms: u64 = value.parse().map_err(|_| ArgError::InvalidValue {
                    flag: "--delay-ms",
                    value: value.clone(),
                    reason: "expected milliseconds",
                })?;
                opts.delay = Some(Duration::from_millis(ms));
            }
            "--policy" => {
                let value = iter.next().ok_or(ArgError::MissingValue("--policy"))?;
                opts.policy = match value.as_str() {
                    "abort" => FailurePolicy::Abort,
                    "isolate" => FailurePolicy::Isolate,
                    _ => {
                        return Err(ArgError::InvalidValue {
                            flag: "--policy",
                            value: value.clone(),
                            reason: "expected `abort` or `isolate`",
                        })
                    }
                };
            }
            "--fail-on" => {
                let value = iter.next().ok_or(ArgError::MissingValue("--fail-on"))?;
                opts.fail_on = Some(value.clone());
            }
            flag if flag.starts_with("--") => return Err(ArgError::UnknownFlag(flag.to_string())),
            _ => opts.positional.push(arg.clone()),
        }
    }

    Ok(opts)
}
