//! # Guard Context
//!
//! `Guard` owns the configuration every guard consults: the alias table,
//! the kind registry, and the legacy diagnostic bridge. Applications build
//! one and pass it where guards are evaluated. [`Guard::global`] is the
//! shared instance behind the crate's free functions and should only be
//! reached for at the outermost composition point.

use std::sync::OnceLock;

use crate::alias::{AliasRegistry, AliasTable};
use crate::bridge::LegacyErrorBridge;
use crate::builder::ExceptionBuilder;
use crate::kind::KindRegistry;

#[derive(Debug, Default)]
pub struct Guard {
    aliases: AliasRegistry,
    kinds: KindRegistry,
    bridge: LegacyErrorBridge,
}

static GLOBAL: OnceLock<Guard> = OnceLock::new();

impl Guard {
    pub fn new(aliases: AliasRegistry, kinds: KindRegistry, bridge: LegacyErrorBridge) -> Self {
        Self {
            aliases,
            kinds,
            bridge,
        }
    }

    /// A guard with the built-in kinds, default reporting, and `aliases`.
    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self {
            aliases: AliasRegistry::new(aliases),
            ..Self::default()
        }
    }

    /// The process-wide guard, created with defaults on first use.
    pub fn global() -> &'static Guard {
        GLOBAL.get_or_init(Guard::default)
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn kinds(&self) -> &KindRegistry {
        &self.kinds
    }

    pub fn bridge(&self) -> &LegacyErrorBridge {
        &self.bridge
    }

    pub fn builder(&self) -> ExceptionBuilder<'_> {
        ExceptionBuilder::new(&self.aliases, &self.kinds)
    }
}
