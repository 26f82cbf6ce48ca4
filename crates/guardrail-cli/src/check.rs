//! # Check Subcommand
//!
//! Runs `throw_if_not_type` over a document mapping type-name tokens to a
//! value or a list of values, in document order:
//!
//! ```yaml
//! string: [alice, bob]
//! int: 42
//! array: [[1, 2, 3]]
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use guardrail_core::{throw_if_not_type, GuardError, TypeCheckOptions, TypeSpec};

use crate::{load_document, print_failure};

/// Arguments for `guardrail check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// YAML or JSON type-spec document.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Reject strings that are empty or all whitespace.
    #[arg(long)]
    pub fail_on_whitespace: bool,

    /// Let null pass every type except `null`.
    #[arg(long)]
    pub allow_nulls: bool,
}

impl CheckArgs {
    fn options(&self) -> TypeCheckOptions {
        TypeCheckOptions::new()
            .fail_on_whitespace(self.fail_on_whitespace)
            .allow_nulls(self.allow_nulls)
    }
}

/// Returns exit code: 0 when every variable passes, 1 on a type violation.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let spec = TypeSpec::from_json(load_document(&args.path)?)?;
    check_spec(&spec, args.options())
}

fn check_spec(spec: &TypeSpec, options: TypeCheckOptions) -> Result<u8> {
    match throw_if_not_type(spec, options) {
        Ok(()) => {
            let variables: usize = spec.entries().iter().map(|(_, vars)| vars.len()).sum();
            tracing::info!(entries = spec.entries().len(), variables, "type check passed");
            println!("OK: {} entries, {variables} variables", spec.entries().len());
            Ok(0)
        }
        Err(err @ GuardError::Type(_)) => {
            print_failure(&err)?;
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(path: PathBuf) -> CheckArgs {
        CheckArgs {
            path,
            fail_on_whitespace: false,
            allow_nulls: false,
        }
    }

    fn spec(doc: &str) -> TypeSpec {
        TypeSpec::from_json(crate::parse_document(doc).unwrap()).unwrap()
    }

    #[test]
    fn passing_document() {
        let spec = spec("string: [alice, bob]\nint: 42\narray: [[1, 2]]\n");
        assert_eq!(check_spec(&spec, TypeCheckOptions::default()).unwrap(), 0);
    }

    #[test]
    fn violation_exits_one() {
        let spec = spec("string: [alice, '  ']\n");
        let options = TypeCheckOptions::new().fail_on_whitespace(true);
        assert_eq!(check_spec(&spec, options).unwrap(), 1);
    }

    #[test]
    fn null_policy_from_flags() {
        let spec = spec("bool: [null]\n");
        assert_eq!(check_spec(&spec, TypeCheckOptions::default()).unwrap(), 1);
        let options = TypeCheckOptions::new().allow_nulls(true);
        assert_eq!(check_spec(&spec, options).unwrap(), 0);
    }

    #[test]
    fn unknown_token_is_operational_error() {
        let spec = spec("unknownType: [1]\n");
        assert!(check_spec(&spec, TypeCheckOptions::default()).is_err());
    }

    #[test]
    fn run_check_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, r#"{"numeric": ["1.5", 2], "scalar": [true]}"#).unwrap();
        assert_eq!(run_check(&args(path)).unwrap(), 0);
    }

    #[test]
    fn run_check_rejects_non_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.yaml");
        std::fs::write(&path, "- 1\n- 2\n").unwrap();
        assert!(run_check(&args(path)).is_err());
    }
}
