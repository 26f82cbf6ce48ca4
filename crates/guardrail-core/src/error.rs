//! # Error Types — Guard Failure Taxonomy
//!
//! Every failure path in this crate is an immediate `Err`. There is no
//! retry and no partial recovery: converting a condition into a raised
//! error is the whole point of a guard.
//!
//! ## Design
//!
//! - Caller misuse (bad descriptor, unknown type token) is `Argument`.
//! - Unresolvable error kinds and malformed constructor arguments are
//!   `Construction`, carrying the kind name and the binding failure.
//! - Failed `ensure`/`ensure_not` guards are `Violation`, carrying the
//!   constructed exception.
//! - Failed type checks are `Type`, carrying position and expected type.
//! - Bridged diagnostics are `Runtime`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exception::Exception;
use crate::kind::ParamType;

/// Source position an error was raised from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of the caller, following `#[track_caller]` frames.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self::new(loc.file(), loc.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Top-level error type for guards.
#[derive(Error, Debug, Clone)]
pub enum GuardError {
    /// The caller passed something the guard cannot interpret.
    #[error("invalid argument: {message}")]
    Argument {
        message: String,
        location: SourceLocation,
    },

    /// A kind reference could not be turned into an exception.
    #[error("cannot construct {kind}: {failure}")]
    Construction {
        /// Kind name after alias substitution.
        kind: String,
        failure: ConstructionFailure,
        location: SourceLocation,
    },

    /// An `ensure`/`ensure_not` guard failed.
    #[error("{0}")]
    Violation(Box<Exception>),

    /// A type check failed.
    #[error("{0}")]
    Type(TypeViolation),

    /// A low-level diagnostic was raised through the legacy bridge.
    #[error("{0}")]
    Runtime(Box<Exception>),
}

impl GuardError {
    #[track_caller]
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
            location: SourceLocation::caller(),
        }
    }

    /// Caller misuse, including failed type checks.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::Argument { .. } | Self::Type(_))
    }

    /// The exception carried by a violation or bridged diagnostic.
    pub fn exception(&self) -> Option<&Exception> {
        match self {
            Self::Violation(e) | Self::Runtime(e) => Some(e),
            _ => None,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Argument { location, .. } | Self::Construction { location, .. } => location,
            Self::Violation(e) | Self::Runtime(e) => e.location(),
            Self::Type(v) => &v.location,
        }
    }
}

/// Why a kind reference could not be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionFailure {
    /// No kind is registered under the resolved name.
    #[error("unknown error kind")]
    UnknownKind,

    #[error("too many constructor arguments: accepts at most {max}, given {given}")]
    TooManyArguments { max: usize, given: usize },

    #[error("missing required argument {name:?} at position {position}")]
    MissingArgument { position: usize, name: String },

    #[error("argument {name:?} at position {position} must be {expected}, got {found}")]
    ArgumentType {
        position: usize,
        name: String,
        expected: ParamType,
        found: &'static str,
    },
}

/// A variable failed its type predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeViolation {
    /// 0-based position of the variable within its entry.
    pub position: usize,
    /// The type-name token as the caller spelled it.
    pub expected: String,
    pub reason: TypeViolationReason,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeViolationReason {
    /// The predicate did not hold.
    WrongType { found: &'static str },
    /// A string consisted only of whitespace while whitespace was rejected.
    Whitespace,
}

impl TypeViolation {
    pub fn message(&self) -> String {
        match self.reason {
            TypeViolationReason::WrongType { .. } => format!(
                "variable at position {} was not a '{}'",
                self.position, self.expected
            ),
            TypeViolationReason::Whitespace => {
                format!("variable at position {} was all whitespace", self.position)
            }
        }
    }
}

impl fmt::Display for TypeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for TypeViolation {}
