//! # Dynamic Values — Strict Equality Semantics
//!
//! Defines `Value`, the dynamically typed datum every guard in this crate
//! operates over. Guards compare values that arrive from configuration
//! files, decoded payloads and script bindings, so the model carries the
//! full set of runtime types a loosely typed caller can hand over.
//!
//! ## Equality Invariant
//!
//! `PartialEq for Value` is *strict*: two values are equal only when they
//! have the same runtime type and the same value. There is no coercion, so
//! `"0"`, `0`, `0.0`, `false`, `null`, `""` and `[]` are mutually distinct.
//! Objects, callables and resources compare by identity. `NaN` is never
//! equal to anything, itself included, which is why `Value` is not `Eq`.
//!
//! ## String Conversion
//!
//! `Display` renders the scalar string conversion used when a value is
//! interpolated into a message: `true` → `1`, `false` and `null` → empty,
//! integral floats without a fractional part, arrays → `Array`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Class name given to objects decoded from JSON/YAML maps.
pub const ANONYMOUS_CLASS: &str = "anonymous";

/// A dynamically typed runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE-754 double.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered list of values.
    Array(Vec<Value>),
    /// Class instance, shared by reference.
    Object(Object),
    /// Invocable closure, shared by reference.
    Callable(Callable),
    /// External handle (file, stream, connection).
    Resource(Resource),
}

impl Value {
    /// Runtime type name, as reported in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Callable(_) => "callable",
            Self::Resource(_) => "resource",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Callable(_))
    }

    /// Objects and closures. A closure is an object that can be invoked.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Callable(_))
    }

    /// Only resources whose handle is still open count as resources.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Resource(r) if r.is_open())
    }

    /// Bool, int, float or string.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::String(_)
        )
    }

    /// Ints, floats, and strings that spell a decimal number.
    pub fn is_numeric(&self) -> bool {
        match self {
            Self::Int(_) | Self::Float(_) => true,
            Self::String(s) => is_numeric_str(s),
            _ => false,
        }
    }

    /// Borrow the inner string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The inner integer, if this is an int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Wrap a closure as a callable value.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Callable(Callable::new(f))
    }
}

/// Whether `s` spells a decimal number: optional surrounding whitespace,
/// optional sign, digits with an optional fraction, optional exponent.
pub fn is_numeric_str(s: &str) -> bool {
    const WS: &[u8] = b" \t\n\r\x0B\x0C";
    let bytes = s.as_bytes();
    let mut start = 0;
    let mut end = bytes.len();
    while start < end && WS.contains(&bytes[start]) {
        start += 1;
    }
    while end > start && WS.contains(&bytes[end - 1]) {
        end -= 1;
    }
    let body = &bytes[start..end];

    let mut i = 0;
    if i < body.len() && (body[i] == b'+' || body[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < body.len() && body[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < body.len() && body[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < body.len() && body[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if i < body.len() && (body[i] == b'e' || body[i] == b'E') {
        i += 1;
        if i < body.len() && (body[i] == b'+' || body[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < body.len() && body[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == body.len()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.same_instance(b),
            (Self::Callable(a), Self::Callable(b)) => a.same_instance(b),
            (Self::Resource(a), Self::Resource(b)) => a.id() == b.id(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Bool(false) => Ok(()),
            Self::Bool(true) => f.write_str("1"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) if x.is_nan() => f.write_str("NAN"),
            Self::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "INF" } else { "-INF" })
            }
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Array(_) => f.write_str("Array"),
            Self::Object(o) => write!(f, "Object({})", o.class()),
            Self::Callable(_) => f.write_str("Closure"),
            Self::Resource(r) => write!(f, "Resource id #{}", r.id()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => f.debug_list().entries(items).finish(),
            Self::Object(o) => o.fmt(f),
            Self::Callable(c) => c.fmt(f),
            Self::Resource(r) => r.fmt(f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(o) => {
                let mut map = serializer.serialize_map(Some(o.properties().len()))?;
                for (k, v) in o.properties() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::Callable(_) | Self::Resource(_) => serializer.collect_str(self),
        }
    }
}

// ── Reference types ─────────────────────────────────────────────────

/// A class instance. Clones share the same instance.
#[derive(Clone)]
pub struct Object(Arc<ObjectData>);

struct ObjectData {
    class: String,
    properties: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(class: impl Into<String>, properties: BTreeMap<String, Value>) -> Self {
        Self(Arc::new(ObjectData {
            class: class.into(),
            properties,
        }))
    }

    pub fn class(&self) -> &str {
        &self.0.class
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.0.properties
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.properties.get(name)
    }

    /// Identity comparison.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.0.class)
            .field("properties", &self.0.properties)
            .finish()
    }
}

type CallableFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// An invocable closure. Clones share the same closure.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }

    /// Identity comparison on the closure allocation.
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0) as *const () == Arc::as_ptr(&other.0) as *const ()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Closure")
    }
}

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// An external handle. Closing a resource is visible through every clone.
#[derive(Clone)]
pub struct Resource {
    id: u64,
    kind: Arc<str>,
    open: Arc<AtomicBool>,
}

impl Resource {
    /// Open a new handle of the given resource type with a fresh id.
    pub fn open(kind: &str) -> Self {
        Self {
            id: NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed),
            kind: Arc::from(kind),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("id", &self.id)
            .field("kind", &&*self.kind)
            .field("open", &self.is_open())
            .finish()
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Self::Int(i64::from(n))
            }
        })*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Self::Callable(c)
    }
}

impl From<Resource> for Value {
    fn from(r: Resource) -> Self {
        Self::Resource(r)
    }
}

/// JSON numbers become ints when they fit `i64` and floats otherwise.
/// JSON maps become instances of [`ANONYMOUS_CLASS`].
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(Object::new(
                ANONYMOUS_CLASS,
                map.into_iter().map(|(k, v)| (k, Self::from(v))).collect(),
            )),
        }
    }
}
