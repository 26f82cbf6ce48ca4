//! # Legacy Diagnostic Bridge
//!
//! Hosts that surface recoverable problems as leveled diagnostics
//! (warnings, notices, deprecations) rather than as errors can route them
//! through [`LegacyErrorBridge::on_runtime_error`] to have them raised as
//! structured [`RUNTIME_ERROR`] exceptions.
//!
//! ## Reporting Mask
//!
//! The bridge consults an ambient reporting mask. While the mask is zero,
//! diagnostics are swallowed and the hook returns `false`. Any non-zero
//! mask raises. [`LegacyErrorBridge::suppress`] zeroes the mask for the
//! lifetime of the returned guard, the counterpart of silencing a single
//! expression.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{GuardError, SourceLocation};
use crate::exception::Exception;
use crate::kind::RUNTIME_ERROR;

/// Diagnostic severity bits.
pub mod level {
    pub const ERROR: i64 = 1;
    pub const WARNING: i64 = 2;
    pub const NOTICE: i64 = 8;
    pub const USER_ERROR: i64 = 256;
    pub const USER_WARNING: i64 = 512;
    pub const USER_NOTICE: i64 = 1024;
    pub const DEPRECATED: i64 = 8192;
    pub const USER_DEPRECATED: i64 = 16384;
    /// Every level.
    pub const ALL: i64 = 32767;
}

/// A receiver for leveled diagnostics.
///
/// Returns `Ok(true)` when the diagnostic was fully handled, `Ok(false)`
/// to let the host fall back to its own handling, or an error to raise.
pub trait DiagnosticHook: Send + Sync {
    fn on_diagnostic(
        &self,
        level: i64,
        message: &str,
        file: Option<&str>,
        line: Option<u32>,
    ) -> Result<bool, GuardError>;
}

#[derive(Debug)]
pub struct LegacyErrorBridge {
    reporting: AtomicI64,
}

impl LegacyErrorBridge {
    pub fn new(reporting: i64) -> Self {
        Self {
            reporting: AtomicI64::new(reporting),
        }
    }

    /// Current reporting mask.
    pub fn reporting(&self) -> i64 {
        self.reporting.load(Ordering::Acquire)
    }

    /// Install a new reporting mask, returning the previous one.
    pub fn set_reporting(&self, mask: i64) -> i64 {
        self.reporting.swap(mask, Ordering::AcqRel)
    }

    /// Zero the reporting mask until the returned guard is dropped.
    pub fn suppress(&self) -> SuppressGuard<'_> {
        let previous = self.set_reporting(0);
        SuppressGuard {
            bridge: self,
            previous,
        }
    }

    /// Swallow the diagnostic (`Ok(false)`) while reporting is suppressed,
    /// otherwise raise it as a [`RUNTIME_ERROR`]. Never returns `Ok(true)`.
    ///
    /// `file` and `line` default to the caller's location.
    #[track_caller]
    pub fn on_runtime_error(
        &self,
        level: i64,
        message: &str,
        file: Option<&str>,
        line: Option<u32>,
    ) -> Result<bool, GuardError> {
        if self.reporting() == 0 {
            tracing::debug!(level, diagnostic = message, "diagnostic suppressed");
            return Ok(false);
        }
        let caller = SourceLocation::caller();
        let location = SourceLocation::new(
            file.unwrap_or(&caller.file),
            line.unwrap_or(caller.line),
        );
        tracing::warn!(level, diagnostic = message, location = %location, "raising diagnostic");
        let exception = Exception::at(RUNTIME_ERROR, message, location)
            .with_field("severity", level)
            .with_field("file", file)
            .with_field("line", line);
        Err(GuardError::Runtime(Box::new(exception)))
    }
}

impl Default for LegacyErrorBridge {
    fn default() -> Self {
        Self::new(level::ALL)
    }
}

impl DiagnosticHook for LegacyErrorBridge {
    fn on_diagnostic(
        &self,
        level: i64,
        message: &str,
        file: Option<&str>,
        line: Option<u32>,
    ) -> Result<bool, GuardError> {
        self.on_runtime_error(level, message, file, line)
    }
}

/// Restores the previous reporting mask on drop.
#[must_use = "reporting is restored as soon as the guard is dropped"]
pub struct SuppressGuard<'a> {
    bridge: &'a LegacyErrorBridge,
    previous: i64,
}

impl Drop for SuppressGuard<'_> {
    fn drop(&mut self) {
        self.bridge.set_reporting(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn runtime(err: GuardError) -> Exception {
        match err {
            GuardError::Runtime(e) => *e,
            other => panic!("Expected Runtime, got: {other}"),
        }
    }

    #[test]
    fn test_raises_with_fields_verbatim() {
        let bridge = LegacyErrorBridge::default();
        let err = bridge
            .on_runtime_error(level::WARNING, "division by zero", Some("/srv/calc.rs"), Some(42))
            .unwrap_err();
        let e = runtime(err);
        assert_eq!(e.kind(), RUNTIME_ERROR);
        assert_eq!(e.message(), "division by zero");
        assert_eq!(e.file(), "/srv/calc.rs");
        assert_eq!(e.line(), 42);
        assert_eq!(e.field("severity"), Some(&Value::Int(level::WARNING)));
        assert_eq!(e.field("file"), Some(&Value::from("/srv/calc.rs")));
        assert_eq!(e.field("line"), Some(&Value::Int(42)));
    }

    #[test]
    fn test_missing_file_and_line_default_to_caller() {
        let bridge = LegacyErrorBridge::default();
        let line = line!() + 1;
        let e = runtime(bridge.on_runtime_error(level::NOTICE, "n", None, None).unwrap_err());
        assert_eq!(e.line(), line);
        assert!(e.file().ends_with("bridge.rs"));
        assert_eq!(e.field("file"), Some(&Value::Null));
    }

    #[test]
    fn test_zero_mask_swallows() {
        let bridge = LegacyErrorBridge::new(0);
        assert!(!bridge.on_runtime_error(level::WARNING, "w", None, None).unwrap());
    }

    #[test]
    fn test_any_nonzero_mask_raises() {
        let bridge = LegacyErrorBridge::new(level::ERROR);
        assert!(bridge.on_runtime_error(level::DEPRECATED, "d", None, None).is_err());
    }

    #[test]
    fn test_suppress_restores_previous_mask() {
        let bridge = LegacyErrorBridge::new(level::WARNING | level::NOTICE);
        {
            let _quiet = bridge.suppress();
            assert_eq!(bridge.reporting(), 0);
            assert!(!bridge.on_runtime_error(level::WARNING, "w", None, None).unwrap());
        }
        assert_eq!(bridge.reporting(), level::WARNING | level::NOTICE);
        assert!(bridge.on_runtime_error(level::WARNING, "w", None, None).is_err());
    }

    #[test]
    fn test_usable_as_dyn_hook() {
        let hook: Box<dyn DiagnosticHook> = Box::new(LegacyErrorBridge::new(0));
        assert!(!hook.on_diagnostic(level::NOTICE, "n", None, None).unwrap());
    }
}
