//! # guardrail-core — Runtime Guards and Error Construction
//!
//! Lets calling code assert invariants and get a well-specified error back
//! when one fails:
//!
//! - `ensure` / `ensure_not` compare under strict equality and pass the
//!   checked value through on success.
//! - `throw_if_not_type` checks groups of variables against type-name
//!   tokens with whitespace and null policies.
//! - Failures can name an error kind (or a short alias for one) with
//!   constructor arguments instead of a plain message.
//! - `get_exception_info` projects any raised error onto a flat record.
//! - `raise_on_runtime_error` promotes leveled diagnostics to errors unless
//!   reporting is suppressed.
//!
//! ## Key Design Principles
//!
//! 1. **Strict equality only.** `Value`'s `PartialEq` never coerces across
//!    types. `0`, `"0"`, `false` and `null` are four different values.
//!
//! 2. **Injectable configuration.** The alias table, kind registry and
//!    reporting mask live on a [`Guard`]. The free functions below use
//!    [`Guard::global`] and exist for the outermost layer of an
//!    application.
//!
//! 3. **Descriptors are a sum type.** [`Descriptor`] is matched
//!    exhaustively; the untyped call shape goes through
//!    [`Descriptor::from_value`].
//!
//! 4. **Type tokens are an enum.** Tokens parse into [`TypeToken`] at the
//!    call boundary; each maps to a predicate by a static `match`.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Every failure is an immediate `Err`; nothing is retried or recovered.

pub mod alias;
pub mod bridge;
pub mod builder;
pub mod ensure;
pub mod error;
pub mod exception;
pub mod guard;
pub mod kind;
pub mod types;
pub mod value;

pub use alias::{default_aliases, AliasRegistry, AliasTable};
pub use bridge::{level, DiagnosticHook, LegacyErrorBridge, SuppressGuard};
pub use builder::{Descriptor, ExceptionBuilder};
pub use error::{ConstructionFailure, GuardError, SourceLocation, TypeViolation, TypeViolationReason};
pub use exception::{get_exception_info, ErrorInfo, ErrorInfoSource, Exception};
pub use guard::Guard;
pub use kind::{KindRegistry, KindSpec, Param, ParamType};
pub use types::{throw_if_not_type, TypeCheckOptions, TypeSpec, TypeToken, UnknownTypeToken};
pub use value::{Callable, Object, Resource, Value};

use std::sync::Arc;

/// [`Guard::ensure`] on the global guard.
#[track_caller]
pub fn ensure(
    expected: impl Into<Value>,
    actual: impl Into<Value>,
    descriptor: impl Into<Descriptor>,
) -> Result<Value, GuardError> {
    Guard::global().ensure(expected, actual, descriptor)
}

/// [`Guard::ensure_not`] on the global guard.
#[track_caller]
pub fn ensure_not(
    forbidden: impl Into<Value>,
    actual: impl Into<Value>,
    descriptor: impl Into<Descriptor>,
) -> Result<Value, GuardError> {
    Guard::global().ensure_not(forbidden, actual, descriptor)
}

/// [`LegacyErrorBridge::on_runtime_error`] on the global guard's bridge.
#[track_caller]
pub fn raise_on_runtime_error(
    level: i64,
    message: &str,
    file: Option<&str>,
    line: Option<u32>,
) -> Result<bool, GuardError> {
    Guard::global().bridge().on_runtime_error(level, message, file, line)
}

/// The global alias table.
pub fn get_exception_aliases() -> Arc<AliasTable> {
    Guard::global().aliases().get()
}

/// Replace the global alias table.
pub fn set_exception_aliases(aliases: AliasTable) {
    Guard::global().aliases().set(aliases)
}
