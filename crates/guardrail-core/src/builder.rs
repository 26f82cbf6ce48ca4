//! # Exception Builder
//!
//! Resolves a [`Descriptor`] into a concrete [`Exception`].
//!
//! ## Resolution Order
//!
//! 1. A pre-built instance is returned unchanged.
//! 2. A message, or a kind reference without arguments, becomes a generic
//!    [`EXCEPTION`] whose message is the descriptor text.
//! 3. A kind reference with arguments has its name substituted through the
//!    alias table, then is constructed from the kind registry with the
//!    arguments bound positionally. Construction failures propagate as
//!    [`GuardError::Construction`]: a bad kind reference is a bug at the
//!    call site, not a condition to paper over.
//!
//! The builder never yields an absent value. An `Absent` descriptor builds
//! a generic exception with an empty message.

use crate::alias::AliasRegistry;
use crate::error::{GuardError, SourceLocation};
use crate::exception::Exception;
use crate::kind::{KindRegistry, EXCEPTION};
use crate::value::Value;

/// Which error to construct.
#[derive(Debug, Clone, Default)]
pub enum Descriptor {
    /// Nothing specified; callers substitute their default message.
    #[default]
    Absent,
    /// A generic error with this message.
    Message(String),
    /// A kind name (or alias) with positional constructor arguments.
    Kind { name: String, args: Vec<Value> },
    /// An already-built exception.
    Instance(Box<Exception>),
}

impl Descriptor {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub fn kind<I, A>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Value>,
    {
        Self::Kind {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Interpret an untyped descriptor and argument list.
    ///
    /// `None` and `Null` are absent (any arguments are ignored), a string
    /// is a message when `args` is empty and a kind reference otherwise.
    /// Anything else is an argument error.
    #[track_caller]
    pub fn from_value(descriptor: Option<Value>, args: Vec<Value>) -> Result<Self, GuardError> {
        match descriptor {
            None | Some(Value::Null) => Ok(Self::Absent),
            Some(Value::String(s)) if args.is_empty() => Ok(Self::Message(s)),
            Some(Value::String(name)) => Ok(Self::Kind { name, args }),
            Some(_) => Err(GuardError::argument(
                "descriptor was not null, a string, or an error instance",
            )),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<()> for Descriptor {
    fn from(_: ()) -> Self {
        Self::Absent
    }
}

impl From<&str> for Descriptor {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for Descriptor {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl<T: Into<Descriptor>> From<Option<T>> for Descriptor {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Absent, Into::into)
    }
}

impl From<Exception> for Descriptor {
    fn from(e: Exception) -> Self {
        Self::Instance(Box::new(e))
    }
}

/// Builds exceptions against an alias table and a kind registry.
#[derive(Debug, Clone, Copy)]
pub struct ExceptionBuilder<'a> {
    aliases: &'a AliasRegistry,
    kinds: &'a KindRegistry,
}

impl<'a> ExceptionBuilder<'a> {
    pub fn new(aliases: &'a AliasRegistry, kinds: &'a KindRegistry) -> Self {
        Self { aliases, kinds }
    }

    #[track_caller]
    pub fn build(&self, descriptor: Descriptor) -> Result<Exception, GuardError> {
        let location = SourceLocation::caller();
        match descriptor {
            Descriptor::Instance(e) => Ok(*e),
            Descriptor::Absent => Ok(Exception::at(EXCEPTION, "", location)),
            Descriptor::Message(message) => Ok(Exception::at(EXCEPTION, message, location)),
            Descriptor::Kind { name, args } if args.is_empty() => {
                Ok(Exception::at(EXCEPTION, name, location))
            }
            Descriptor::Kind { name, args } => {
                let kind = match self.aliases.resolve(&name) {
                    Some(target) => {
                        tracing::trace!(alias = %name, kind = %target, "resolved exception alias");
                        target
                    }
                    None => name,
                };
                self.kinds.construct(&kind, args, location)
            }
        }
    }
}
