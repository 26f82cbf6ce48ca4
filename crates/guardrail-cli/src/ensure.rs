//! # Ensure Subcommand
//!
//! Evaluates `ensure` (or `ensure_not` with `--not`) over two JSON
//! literals. The failure descriptor is either a plain `--message` or a
//! `--kind` with positional `--arg` JSON literals; kind names resolve
//! through the configured alias table.
//!
//! JSON objects become distinct instances, so two objects never compare
//! equal even when their members match.

use anyhow::{Context, Result};
use clap::Args;
use guardrail_core::{Descriptor, Guard, GuardError, Value};

/// Arguments for `guardrail ensure`.
#[derive(Args, Debug)]
pub struct EnsureArgs {
    /// Reference value as a JSON literal.
    #[arg(long, value_name = "JSON")]
    pub expected: String,

    /// Value under test as a JSON literal.
    #[arg(long, value_name = "JSON")]
    pub actual: String,

    /// Fail when the values are equal instead of when they differ.
    #[arg(long)]
    pub not: bool,

    /// Message for the raised error.
    #[arg(long, conflicts_with = "kind")]
    pub message: Option<String>,

    /// Error kind or alias to construct on failure.
    #[arg(long)]
    pub kind: Option<String>,

    /// Constructor argument for `--kind` as a JSON literal; repeatable.
    #[arg(long = "arg", value_name = "JSON", requires = "kind")]
    pub args: Vec<String>,
}

fn parse_literal(flag: &str, raw: &str) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON: {raw}"))?;
    Ok(Value::from(json))
}

impl EnsureArgs {
    fn descriptor(&self) -> Result<Descriptor> {
        if let Some(message) = &self.message {
            return Ok(Descriptor::message(message.clone()));
        }
        match &self.kind {
            Some(kind) => {
                let args = self
                    .args
                    .iter()
                    .map(|raw| parse_literal("--arg", raw))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Descriptor::kind(kind.clone(), args))
            }
            None => Ok(Descriptor::Absent),
        }
    }
}

/// Returns exit code: 0 when the guard passes, 1 when it raises.
pub fn run_ensure(args: &EnsureArgs, guard: &Guard) -> Result<u8> {
    let expected = parse_literal("--expected", &args.expected)?;
    let actual = parse_literal("--actual", &args.actual)?;
    let descriptor = args.descriptor()?;

    let outcome = if args.not {
        guard.ensure_not(expected, actual, descriptor)
    } else {
        guard.ensure(expected, actual, descriptor)
    };

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string(&value)?);
            Ok(0)
        }
        Err(err @ GuardError::Violation(_)) => {
            crate::print_failure(&err)?;
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}
