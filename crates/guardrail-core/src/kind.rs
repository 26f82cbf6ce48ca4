//! # Error Kinds — Constructible Exception Types
//!
//! A kind reference names an error kind and supplies positional
//! constructor arguments. The `KindRegistry` maps fully-qualified kind
//! names to their constructor signatures and binds arguments against them.
//!
//! ## Binding Rules
//!
//! - Arguments bind to parameters by position.
//! - More arguments than parameters is an error.
//! - A missing argument takes the parameter's default; a missing argument
//!   for a required parameter is an error.
//! - Each bound argument must satisfy the parameter's `ParamType`.
//! - Parameters named `message` and `code` populate the exception's
//!   message and code. `file` and `line`, when non-empty, replace the
//!   recorded source location. Everything else is kept as a named field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{ConstructionFailure, GuardError, SourceLocation};
use crate::exception::Exception;
use crate::value::Value;

/// Generic error carrying only a message.
pub const EXCEPTION: &str = "guardrail::Exception";
/// Caller misuse.
pub const ARGUMENT_ERROR: &str = "guardrail::ArgumentError";
/// A value was not what the caller expected.
pub const UNEXPECTED_VALUE: &str = "guardrail::UnexpectedValue";
/// HTTP-facing failure carrying a status code.
pub const HTTP_ERROR: &str = "guardrail::HttpError";
/// A low-level diagnostic promoted to an error.
pub const RUNTIME_ERROR: &str = "guardrail::RuntimeError";
/// Label reported for failed kind construction. Not itself constructible.
pub const CONSTRUCTION_ERROR: &str = "guardrail::ConstructionError";

/// Accepted runtime type of a constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Int,
    String,
    Any,
}

impl ParamType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Int => value.is_int(),
            Self::String => value.is_string(),
            Self::Any => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::String => "string",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positional constructor parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
    /// `None` marks the parameter as required.
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, ty: ParamType, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            ty,
            default: Some(default.into()),
        }
    }
}

/// A constructible error kind.
#[derive(Debug, Clone)]
pub struct KindSpec {
    pub name: String,
    pub params: Vec<Param>,
}

impl KindSpec {
    pub fn new(name: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// A kind taking the conventional `(message = "", code = 0)` signature.
    pub fn message_kind(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![
                Param::optional("message", ParamType::String, ""),
                Param::optional("code", ParamType::Int, 0),
            ],
        )
    }

    /// Bind `args` against this kind's signature and build the exception.
    pub fn construct(&self, args: Vec<Value>, location: SourceLocation) -> Result<Exception, GuardError> {
        let fail = |failure| GuardError::Construction {
            kind: self.name.clone(),
            failure,
            location: location.clone(),
        };

        if args.len() > self.params.len() {
            return Err(fail(ConstructionFailure::TooManyArguments {
                max: self.params.len(),
                given: args.len(),
            }));
        }

        let mut bound = BTreeMap::new();
        let mut args = args.into_iter();
        for (position, param) in self.params.iter().enumerate() {
            let value = match (args.next(), &param.default) {
                (Some(v), _) => v,
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(fail(ConstructionFailure::MissingArgument {
                        position,
                        name: param.name.clone(),
                    }))
                }
            };
            if !param.ty.accepts(&value) {
                return Err(fail(ConstructionFailure::ArgumentType {
                    position,
                    name: param.name.clone(),
                    expected: param.ty,
                    found: value.type_name(),
                }));
            }
            bound.insert(param.name.clone(), value);
        }

        let message = bound
            .remove("message")
            .map(|v| v.to_string())
            .unwrap_or_default();
        let code = bound.remove("code").and_then(|v| v.as_int()).unwrap_or(0);

        let file = bound.get("file").and_then(Value::as_str).unwrap_or("");
        let line = bound.get("line").and_then(Value::as_int).unwrap_or(0);
        let location = if !file.is_empty() && line > 0 {
            SourceLocation::new(file, u32::try_from(line).unwrap_or(u32::MAX))
        } else {
            location.clone()
        };

        let mut exception = Exception::at(&self.name, message, location).with_code(code);
        for (name, value) in bound {
            exception = exception.with_field(name, value);
        }
        Ok(exception)
    }
}

/// Registry of constructible error kinds, keyed by fully-qualified name.
#[derive(Debug)]
pub struct KindRegistry {
    kinds: RwLock<BTreeMap<String, Arc<KindSpec>>>,
}

impl KindRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            kinds: RwLock::new(BTreeMap::new()),
        }
    }

    /// A registry holding the built-in kinds.
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        registry.register(KindSpec::message_kind(EXCEPTION));
        registry.register(KindSpec::message_kind(ARGUMENT_ERROR));
        registry.register(KindSpec::message_kind(UNEXPECTED_VALUE));
        registry.register(KindSpec::new(
            HTTP_ERROR,
            vec![
                Param::required("status", ParamType::Int),
                Param::optional("message", ParamType::String, ""),
                Param::optional("code", ParamType::Int, 0),
            ],
        ));
        registry.register(KindSpec::new(
            RUNTIME_ERROR,
            vec![
                Param::optional("message", ParamType::String, ""),
                Param::optional("code", ParamType::Int, 0),
                Param::optional("severity", ParamType::Int, 1),
                Param::optional("file", ParamType::String, ""),
                Param::optional("line", ParamType::Int, 0),
            ],
        ));
        registry
    }

    /// Register a kind, replacing any previous kind of the same name.
    pub fn register(&self, spec: KindSpec) {
        self.kinds.write().insert(spec.name.clone(), Arc::new(spec));
    }

    pub fn get(&self, name: &str) -> Option<Arc<KindSpec>> {
        self.kinds.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.kinds.read().keys().cloned().collect()
    }

    /// Construct the named kind with positional `args`.
    pub fn construct(
        &self,
        name: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Exception, GuardError> {
        let spec = self.get(name).ok_or_else(|| GuardError::Construction {
            kind: name.to_string(),
            failure: ConstructionFailure::UnknownKind,
            location: location.clone(),
        })?;
        spec.construct(args, location)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> SourceLocation {
        SourceLocation::new("src/app.rs", 10)
    }

    fn construction_failure(err: GuardError) -> ConstructionFailure {
        match err {
            GuardError::Construction { failure, .. } => failure,
            other => panic!("Expected Construction, got: {other}"),
        }
    }

    #[test]
    fn test_builtins_registered() {
        let registry = KindRegistry::with_builtins();
        for name in [EXCEPTION, ARGUMENT_ERROR, UNEXPECTED_VALUE, HTTP_ERROR, RUNTIME_ERROR] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(!registry.contains(CONSTRUCTION_ERROR));
    }

    #[test]
    fn test_http_error_binds_positionally() {
        let registry = KindRegistry::default();
        let e = registry
            .construct(HTTP_ERROR, vec![Value::Int(404), Value::from("Not Found")], here())
            .unwrap();
        assert_eq!(e.kind(), HTTP_ERROR);
        assert_eq!(e.message(), "Not Found");
        assert_eq!(e.code(), 0);
        assert_eq!(e.field("status"), Some(&Value::Int(404)));
        assert_eq!(e.line(), 10);
    }

    #[test]
    fn test_missing_required_argument() {
        let registry = KindRegistry::default();
        let err = registry.construct(HTTP_ERROR, vec![], here()).unwrap_err();
        assert_eq!(
            construction_failure(err),
            ConstructionFailure::MissingArgument {
                position: 0,
                name: "status".to_string()
            }
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let registry = KindRegistry::default();
        let args = vec![Value::from("m"), Value::Int(1), Value::Int(2)];
        let err = registry.construct(EXCEPTION, args, here()).unwrap_err();
        assert_eq!(
            construction_failure(err),
            ConstructionFailure::TooManyArguments { max: 2, given: 3 }
        );
    }

    #[test]
    fn test_argument_type_mismatch() {
        let registry = KindRegistry::default();
        let err = registry
            .construct(HTTP_ERROR, vec![Value::from("404")], here())
            .unwrap_err();
        assert_eq!(
            construction_failure(err),
            ConstructionFailure::ArgumentType {
                position: 0,
                name: "status".to_string(),
                expected: ParamType::Int,
                found: "string",
            }
        );
    }

    #[test]
    fn test_unknown_kind() {
        let registry = KindRegistry::default();
        let err = registry
            .construct("app::Missing", vec![Value::Int(1)], here())
            .unwrap_err();
        match &err {
            GuardError::Construction { kind, .. } => assert_eq!(kind, "app::Missing"),
            other => panic!("Expected Construction, got: {other}"),
        }
        assert_eq!(construction_failure(err), ConstructionFailure::UnknownKind);
    }

    #[test]
    fn test_file_and_line_override_location() {
        let registry = KindRegistry::default();
        let args = vec![
            Value::from("disk full"),
            Value::Int(0),
            Value::Int(2),
            Value::from("/srv/app/io.rs"),
            Value::Int(88),
        ];
        let e = registry.construct(RUNTIME_ERROR, args, here()).unwrap();
        assert_eq!(e.file(), "/srv/app/io.rs");
        assert_eq!(e.line(), 88);
        assert_eq!(e.field("severity"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_register_custom_kind() {
        let registry = KindRegistry::empty();
        registry.register(KindSpec::new(
            "app::QuotaExceeded",
            vec![
                Param::required("tenant", ParamType::String),
                Param::required("limit", ParamType::Int),
            ],
        ));
        let e = registry
            .construct(
                "app::QuotaExceeded",
                vec![Value::from("acme"), Value::Int(100)],
                here(),
            )
            .unwrap();
        assert_eq!(e.message(), "");
        assert_eq!(e.field("tenant"), Some(&Value::from("acme")));
        assert_eq!(registry.names(), vec!["app::QuotaExceeded".to_string()]);
    }
}
