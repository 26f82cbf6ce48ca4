//! # Exceptions and Error Info
//!
//! `Exception` is the concrete error object a guard raises: a kind name,
//! a message, an integer code, the source location it was raised from, a
//! rendered backtrace, and whatever named fields its kind's constructor
//! bound.
//!
//! `ErrorInfo` is the flat projection of those standard fields, produced
//! by [`get_exception_info`] for logging and for callers that only need a
//! record.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, SourceLocation};
use crate::kind;
use crate::value::Value;

/// A raised error object.
#[derive(Debug, Clone)]
pub struct Exception {
    kind: String,
    message: String,
    code: i64,
    location: SourceLocation,
    trace: String,
    fields: BTreeMap<String, Value>,
    previous: Option<Box<Exception>>,
}

impl Exception {
    /// Create an exception raised from the caller's location.
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::at(kind, message, SourceLocation::caller())
    }

    /// A generic exception carrying only a message.
    #[track_caller]
    pub fn generic(message: impl Into<String>) -> Self {
        Self::at(kind::EXCEPTION, message, SourceLocation::caller())
    }

    /// Create an exception raised from an explicit location.
    pub fn at(kind: impl Into<String>, message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            code: 0,
            location,
            trace: capture_trace(),
            fields: BTreeMap::new(),
            previous: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_previous(mut self, previous: Exception) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    pub(crate) fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn file(&self) -> &str {
        &self.location.file
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    /// Rendered backtrace; empty unless backtraces are enabled
    /// (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// A constructor argument bound by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn previous(&self) -> Option<&Exception> {
        self.previous.as_deref()
    }

    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.kind.clone(),
            message: self.message.clone(),
            code: self.code,
            file: self.location.file.clone(),
            line: self.location.line,
            trace: self.trace.clone(),
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Exception {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.previous
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

fn capture_trace() -> String {
    let bt = Backtrace::capture();
    match bt.status() {
        BacktraceStatus::Captured => bt.to_string(),
        _ => String::new(),
    }
}

/// The standard fields of a caught error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Fully-qualified kind name.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub code: i64,
    pub file: String,
    pub line: u32,
    pub trace: String,
}

/// Anything [`get_exception_info`] can project.
pub trait ErrorInfoSource {
    fn error_info(&self) -> ErrorInfo;
}

impl ErrorInfoSource for Exception {
    fn error_info(&self) -> ErrorInfo {
        self.info()
    }
}

impl ErrorInfoSource for GuardError {
    fn error_info(&self) -> ErrorInfo {
        match self {
            Self::Violation(e) | Self::Runtime(e) => e.info(),
            Self::Argument { message, location } => ErrorInfo {
                kind: kind::ARGUMENT_ERROR.to_string(),
                message: message.clone(),
                code: 0,
                file: location.file.clone(),
                line: location.line,
                trace: String::new(),
            },
            Self::Type(violation) => ErrorInfo {
                kind: kind::ARGUMENT_ERROR.to_string(),
                message: violation.message(),
                code: 0,
                file: violation.location.file.clone(),
                line: violation.location.line,
                trace: String::new(),
            },
            Self::Construction { location, .. } => ErrorInfo {
                kind: kind::CONSTRUCTION_ERROR.to_string(),
                message: self.to_string(),
                code: 0,
                file: location.file.clone(),
                line: location.line,
                trace: String::new(),
            },
        }
    }
}

/// Project a caught error onto its standard fields.
pub fn get_exception_info(error: &impl ErrorInfoSource) -> ErrorInfo {
    error.error_info()
}
