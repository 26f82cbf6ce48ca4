//! # Ensure / EnsureNot
//!
//! Strict-equality guards. On success the checked value is passed
//! through, so a guard can wrap an expression in place:
//!
//! ```
//! use guardrail_core::{Guard, Value};
//!
//! let guard = Guard::default();
//! let n = guard.ensure(3, 1 + 2, ()).unwrap();
//! assert_eq!(n, Value::Int(3));
//! ```
//!
//! On failure the descriptor (or a default message naming both values) is
//! built into an exception and returned as [`GuardError::Violation`].
//! Errors from building the descriptor itself propagate unchanged.

use crate::builder::Descriptor;
use crate::error::GuardError;
use crate::guard::Guard;
use crate::value::Value;

impl Guard {
    /// Pass `actual` through if it strictly equals `expected`.
    #[track_caller]
    pub fn ensure(
        &self,
        expected: impl Into<Value>,
        actual: impl Into<Value>,
        descriptor: impl Into<Descriptor>,
    ) -> Result<Value, GuardError> {
        let expected = expected.into();
        let actual = actual.into();
        if expected == actual {
            return Ok(actual);
        }
        let descriptor = descriptor.into();
        let descriptor = if descriptor.is_absent() {
            Descriptor::Message(format!("'{expected}' did not equal '{actual}'"))
        } else {
            descriptor
        };
        Err(self.violation(descriptor, &expected, &actual)?)
    }

    /// Pass `actual` through unless it strictly equals `forbidden`.
    #[track_caller]
    pub fn ensure_not(
        &self,
        forbidden: impl Into<Value>,
        actual: impl Into<Value>,
        descriptor: impl Into<Descriptor>,
    ) -> Result<Value, GuardError> {
        let forbidden = forbidden.into();
        let actual = actual.into();
        if forbidden != actual {
            return Ok(actual);
        }
        let descriptor = descriptor.into();
        let descriptor = if descriptor.is_absent() {
            Descriptor::Message(format!("'{forbidden}' equals '{actual}'"))
        } else {
            descriptor
        };
        Err(self.violation(descriptor, &forbidden, &actual)?)
    }

    #[track_caller]
    fn violation(
        &self,
        descriptor: Descriptor,
        reference: &Value,
        actual: &Value,
    ) -> Result<GuardError, GuardError> {
        let exception = self.builder().build(descriptor)?;
        tracing::debug!(
            reference = ?reference,
            actual = ?actual,
            kind = exception.kind(),
            location = %exception.location(),
            "guard failed"
        );
        Ok(GuardError::Violation(Box::new(exception)))
    }
}
