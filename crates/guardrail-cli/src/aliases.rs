//! # Aliases Subcommand
//!
//! Prints the alias table the guard will resolve kind references with,
//! after configuration has been applied.

use anyhow::Result;
use clap::Args;
use guardrail_core::Guard;
use serde::Serialize;

/// Arguments for `guardrail aliases`.
#[derive(Args, Debug)]
pub struct AliasesArgs {
    /// Also list every constructible error kind.
    #[arg(long)]
    pub kinds: bool,
}

#[derive(Serialize)]
struct AliasReport<'a> {
    aliases: &'a guardrail_core::AliasTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    kinds: Option<Vec<String>>,
}

pub fn run_aliases(args: &AliasesArgs, guard: &Guard) -> Result<u8> {
    println!("{}", render_aliases(args, guard)?);
    Ok(0)
}

fn render_aliases(args: &AliasesArgs, guard: &Guard) -> Result<String> {
    let aliases = guard.aliases().get();
    let report = AliasReport {
        aliases: &aliases,
        kinds: args.kinds.then(|| guard.kinds().names()),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
