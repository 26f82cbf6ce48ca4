//! # Type Validation
//!
//! Checks groups of variables against type-name tokens:
//!
//! ```
//! use guardrail_core::{throw_if_not_type, TypeCheckOptions, TypeSpec, Value};
//!
//! let spec = TypeSpec::new()
//!     .check("string", vec!["a", "b"])
//!     .check("int", 42)
//!     .check("bool", Value::Null);
//! throw_if_not_type(&spec, TypeCheckOptions::new().allow_nulls(true)).unwrap();
//! ```
//!
//! ## Semantics
//!
//! - Entries are processed in insertion order, variables in sequence
//!   order. The first failure returns; nothing is aggregated.
//! - A type token is resolved before any of its variables are examined.
//!   Unknown tokens are an argument error.
//! - `allow_nulls` lets null pass every predicate except `null` itself,
//!   which only ever accepts null.
//! - `fail_on_whitespace` rejects strings that trim to nothing, with a
//!   message distinct from a type mismatch.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{GuardError, SourceLocation, TypeViolation, TypeViolationReason};
use crate::value::Value;

/// Characters stripped when deciding whether a string is all whitespace.
const TRIMMED: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B'];

/// A recognized type-name token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeToken {
    Bool,
    Null,
    String,
    Array,
    Callable,
    /// `double`, `float` or `real`.
    Float,
    /// `int`, `integer` or `long`.
    Int,
    Numeric,
    Object,
    Resource,
    Scalar,
}

/// The token did not name a known predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("type '{0}' was not a recognized predicate")]
pub struct UnknownTypeToken(pub String);

impl TypeToken {
    pub fn all() -> &'static [TypeToken] {
        &[
            Self::Bool,
            Self::Null,
            Self::String,
            Self::Array,
            Self::Callable,
            Self::Float,
            Self::Int,
            Self::Numeric,
            Self::Object,
            Self::Resource,
            Self::Scalar,
        ]
    }

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Null => "null",
            Self::String => "string",
            Self::Array => "array",
            Self::Callable => "callable",
            Self::Float => "float",
            Self::Int => "int",
            Self::Numeric => "numeric",
            Self::Object => "object",
            Self::Resource => "resource",
            Self::Scalar => "scalar",
        }
    }

    /// The native predicate for this token, ignoring null and whitespace
    /// policy.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_bool(),
            Self::Null => value.is_null(),
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Callable => value.is_callable(),
            Self::Float => value.is_float(),
            Self::Int => value.is_int(),
            Self::Numeric => value.is_numeric(),
            Self::Object => value.is_object(),
            Self::Resource => value.is_resource(),
            Self::Scalar => value.is_scalar(),
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeToken {
    type Err = UnknownTypeToken;

    /// Case-sensitive; accepts the aliases listed on each variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(Self::Bool),
            "null" => Ok(Self::Null),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "callable" => Ok(Self::Callable),
            "double" | "float" | "real" => Ok(Self::Float),
            "int" | "integer" | "long" => Ok(Self::Int),
            "numeric" => Ok(Self::Numeric),
            "object" => Ok(Self::Object),
            "resource" => Ok(Self::Resource),
            "scalar" => Ok(Self::Scalar),
            other => Err(UnknownTypeToken(other.to_string())),
        }
    }
}

/// Ordered type-name → variables mapping.
#[derive(Debug, Clone, Default)]
pub struct TypeSpec {
    entries: Vec<(String, Vec<Value>)>,
}

impl TypeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. An array value is the sequence of variables to check;
    /// any other value is checked on its own. To check that a variable is
    /// an array, wrap it: `vec![Value::from(vec![1, 2])]`.
    pub fn check(mut self, type_name: impl Into<String>, variables: impl Into<Value>) -> Self {
        let variables = match variables.into() {
            Value::Array(items) => items,
            single => vec![single],
        };
        self.entries.push((type_name.into(), variables));
        self
    }

    /// Add an entry from an explicit sequence of variables.
    pub fn check_each<I, V>(mut self, type_name: impl Into<String>, variables: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.entries.push((
            type_name.into(),
            variables.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Build from a JSON object, preserving key order.
    #[track_caller]
    pub fn from_json(json: serde_json::Value) -> Result<Self, GuardError> {
        let serde_json::Value::Object(map) = json else {
            return Err(GuardError::argument("type spec must be an object"));
        };
        Ok(map
            .into_iter()
            .fold(Self::new(), |spec, (type_name, vars)| {
                spec.check(type_name, Value::from(vars))
            }))
    }

    pub fn entries(&self) -> &[(String, Vec<Value>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Null and whitespace policy for [`throw_if_not_type`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCheckOptions {
    pub fail_on_whitespace: bool,
    pub allow_nulls: bool,
}

impl TypeCheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on_whitespace(mut self, fail: bool) -> Self {
        self.fail_on_whitespace = fail;
        self
    }

    pub fn allow_nulls(mut self, allow: bool) -> Self {
        self.allow_nulls = allow;
        self
    }
}

/// Check every variable in `spec` against its type token.
#[track_caller]
pub fn throw_if_not_type(spec: &TypeSpec, options: TypeCheckOptions) -> Result<(), GuardError> {
    let location = SourceLocation::caller();
    for (type_name, variables) in &spec.entries {
        let token: TypeToken = type_name.parse().map_err(|e: UnknownTypeToken| {
            GuardError::Argument {
                message: e.to_string(),
                location: location.clone(),
            }
        })?;
        for (position, value) in variables.iter().enumerate() {
            if let Some(reason) = check_one(token, value, options) {
                tracing::debug!(
                    position,
                    expected = %type_name,
                    found = value.type_name(),
                    "type check failed"
                );
                return Err(GuardError::Type(TypeViolation {
                    position,
                    expected: type_name.clone(),
                    reason,
                    location,
                }));
            }
        }
    }
    Ok(())
}

/// `None` if `value` passes `token` under `options`.
fn check_one(token: TypeToken, value: &Value, options: TypeCheckOptions) -> Option<TypeViolationReason> {
    let wrong_type = || Some(TypeViolationReason::WrongType {
        found: value.type_name(),
    });
    match (token, value) {
        (TypeToken::Null, Value::Null) => None,
        (TypeToken::Null, _) => wrong_type(),
        (_, Value::Null) if options.allow_nulls => None,
        (TypeToken::String, Value::String(s)) => {
            if options.fail_on_whitespace && s.trim_matches(TRIMMED).is_empty() {
                Some(TypeViolationReason::Whitespace)
            } else {
                None
            }
        }
        (token, value) if token.matches(value) => None,
        _ => wrong_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, Resource};
    use std::collections::BTreeMap;

    fn violation(err: GuardError) -> TypeViolation {
        match err {
            GuardError::Type(v) => v,
            other => panic!("Expected Type, got: {other}"),
        }
    }

    fn check(spec: TypeSpec) -> Result<(), GuardError> {
        throw_if_not_type(&spec, TypeCheckOptions::default())
    }

    #[test]
    fn test_token_aliases() {
        for (s, token) in [
            ("double", TypeToken::Float),
            ("float", TypeToken::Float),
            ("real", TypeToken::Float),
            ("int", TypeToken::Int),
            ("integer", TypeToken::Int),
            ("long", TypeToken::Int),
        ] {
            assert_eq!(s.parse::<TypeToken>().unwrap(), token);
        }
    }

    #[test]
    fn test_canonical_spelling_roundtrip() {
        for token in TypeToken::all() {
            assert_eq!(token.as_str().parse::<TypeToken>().unwrap(), *token);
        }
    }

    #[test]
    fn test_unknown_token_is_argument_error() {
        let err = check(TypeSpec::new().check("unknownType", 1)).unwrap_err();
        assert!(matches!(err, GuardError::Argument { .. }));
        assert_eq!(
            err.to_string(),
            "invalid argument: type 'unknownType' was not a recognized predicate"
        );
        assert!("Int".parse::<TypeToken>().is_err());
    }

    #[test]
    fn test_unknown_token_rejected_even_without_variables() {
        let spec = TypeSpec::new().check_each("nope", Vec::<Value>::new());
        assert!(check(spec).is_err());
    }

    #[test]
    fn test_strings_pass() {
        check(TypeSpec::new().check("string", vec!["a", "b"])).unwrap();
    }

    #[test]
    fn test_whitespace_rejected_at_position() {
        let spec = TypeSpec::new().check("string", vec!["a", "  "]);
        let options = TypeCheckOptions::new().fail_on_whitespace(true);
        let v = violation(throw_if_not_type(&spec, options).unwrap_err());
        assert_eq!(v.position, 1);
        assert_eq!(v.reason, TypeViolationReason::Whitespace);
        assert_eq!(v.to_string(), "variable at position 1 was all whitespace");
    }

    #[test]
    fn test_whitespace_allowed_by_default() {
        check(TypeSpec::new().check("string", vec!["a", " \t\n"])).unwrap();
    }

    #[test]
    fn test_empty_string_fails_whitespace_policy() {
        let spec = TypeSpec::new().check("string", "");
        let options = TypeCheckOptions::new().fail_on_whitespace(true);
        assert!(throw_if_not_type(&spec, options).is_err());
    }

    #[test]
    fn test_non_string_reports_type_mismatch() {
        let spec = TypeSpec::new().check("string", vec![Value::from("a"), Value::Int(1)]);
        let v = violation(check(spec).unwrap_err());
        assert_eq!(v.position, 1);
        assert_eq!(v.reason, TypeViolationReason::WrongType { found: "int" });
        assert_eq!(v.to_string(), "variable at position 1 was not a 'string'");
    }

    #[test]
    fn test_allow_nulls() {
        let spec = TypeSpec::new().check("bool", vec![Value::Null]);
        throw_if_not_type(&spec, TypeCheckOptions::new().allow_nulls(true)).unwrap();
        assert!(check(spec).is_err());
    }

    #[test]
    fn test_allow_nulls_covers_string_and_others() {
        let options = TypeCheckOptions::new().allow_nulls(true).fail_on_whitespace(true);
        for token in ["string", "int", "array", "object", "scalar", "numeric"] {
            let spec = TypeSpec::new().check(token, Value::Null);
            throw_if_not_type(&spec, options).unwrap();
        }
    }

    #[test]
    fn test_null_token_ignores_allow_nulls() {
        let options = TypeCheckOptions::new().allow_nulls(true);
        throw_if_not_type(&TypeSpec::new().check("null", Value::Null), options).unwrap();
        let spec = TypeSpec::new().check("null", 0);
        assert!(throw_if_not_type(&spec, options).is_err());
    }

    #[test]
    fn test_single_variable_is_one_element_sequence() {
        let v = violation(check(TypeSpec::new().check("int", "7")).unwrap_err());
        assert_eq!(v.position, 0);
    }

    #[test]
    fn test_array_needs_wrapping() {
        let inner = Value::from(vec![1, 2]);
        check(TypeSpec::new().check("array", vec![inner.clone()])).unwrap();
        check(TypeSpec::new().check_each("array", [inner])).unwrap();
        assert!(check(TypeSpec::new().check("array", vec![1, 2])).is_err());
    }

    #[test]
    fn test_first_failure_wins_in_entry_order() {
        let spec = TypeSpec::new()
            .check("int", vec![1, 2])
            .check("bool", vec![Value::Bool(true), Value::Int(0)])
            .check("nope", 1);
        let v = violation(check(spec).unwrap_err());
        assert_eq!(v.expected, "bool");
        assert_eq!(v.position, 1);
    }

    #[test]
    fn test_native_predicates() {
        let obj = Value::from(Object::new("Point", BTreeMap::new()));
        let closure = Value::callable(|_| Value::Null);
        let resource = Value::from(Resource::open("stream"));
        check(
            TypeSpec::new()
                .check_each("float", [Value::Float(1.5)])
                .check_each("double", [Value::Float(0.0)])
                .check_each("integer", [Value::Int(-3)])
                .check_each("numeric", [Value::Int(1), Value::Float(2.5), Value::from("3e2")])
                .check_each("object", [obj.clone(), closure.clone()])
                .check_each("callable", [closure])
                .check_each("resource", [resource])
                .check_each("scalar", [Value::Bool(false), Value::from(""), Value::Int(0)]),
        )
        .unwrap();
        assert!(check(TypeSpec::new().check_each("callable", [obj])).is_err());
        assert!(check(TypeSpec::new().check("float", 1)).is_err());
        assert!(check(TypeSpec::new().check("int", 1.0)).is_err());
        assert!(check(TypeSpec::new().check("numeric", "abc")).is_err());
        assert!(check(TypeSpec::new().check("scalar", Value::Null)).is_err());
    }

    #[test]
    fn test_closed_resource_fails() {
        let r = Resource::open("socket");
        r.close();
        assert!(check(TypeSpec::new().check("resource", Value::from(r))).is_err());
    }

    #[test]
    fn test_from_json_preserves_order() {
        let json = serde_json::json!({"string": ["a"], "bool": [true, 1]});
        let spec = TypeSpec::from_json(json).unwrap();
        let names: Vec<_> = spec.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["string", "bool"]);
        let v = violation(check(spec).unwrap_err());
        assert_eq!((v.expected.as_str(), v.position), ("bool", 1));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = TypeSpec::from_json(serde_json::json!([1])).unwrap_err();
        assert!(err.is_argument_error());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every string passes `string` when whitespace is allowed.
        #[test]
        fn any_string_is_a_string(s in ".*") {
            let spec = TypeSpec::new().check_each("string", [s]);
            prop_assert!(throw_if_not_type(&spec, TypeCheckOptions::default()).is_ok());
        }

        /// The reported position is the index of the first offender.
        #[test]
        fn position_of_first_non_int(ints in prop::collection::vec(any::<i64>(), 0..10)) {
            let mut vars: Vec<Value> = ints.iter().copied().map(Value::Int).collect();
            vars.push(Value::from("x"));
            vars.push(Value::Bool(true));
            let spec = TypeSpec::new().check_each("int", vars);
            match throw_if_not_type(&spec, TypeCheckOptions::default()) {
                Err(GuardError::Type(v)) => {
                    prop_assert_eq!(v.position, ints.len());
                }
                other => {
                    prop_assert!(false, "unexpected result: {:?}", other);
                }
            }
        }

        /// Null passes every token but `null` only when nulls are allowed.
        #[test]
        fn null_policy(idx in 0usize..11) {
            let token = TypeToken::all()[idx];
            let spec = TypeSpec::new().check_each(token.as_str(), [Value::Null]);
            let allowed = throw_if_not_type(&spec, TypeCheckOptions::new().allow_nulls(true));
            let strict = throw_if_not_type(&spec, TypeCheckOptions::default());
            prop_assert!(allowed.is_ok());
            prop_assert_eq!(strict.is_ok(), token == TypeToken::Null);
        }
    }
}
