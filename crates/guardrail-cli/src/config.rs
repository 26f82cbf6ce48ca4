//! Guard configuration.
//!
//! Loaded from a YAML or JSON file (YAML is a superset, so one parser
//! reads both). The file path comes from `--config` or `GUARDRAIL_CONFIG`;
//! `GUARDRAIL_ERROR_REPORTING` overrides the reporting mask. Every field
//! is optional and defaults to the built-in behavior.
//!
//! ```yaml
//! aliases:
//!   http: guardrail::HttpError
//!   conflict: app::Conflict
//! error_reporting: 32767
//! ```

use std::path::{Path, PathBuf};

use guardrail_core::{
    default_aliases, level, AliasRegistry, AliasTable, Guard, KindRegistry, LegacyErrorBridge,
};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "GUARDRAIL_CONFIG";
pub const REPORTING_ENV: &str = "GUARDRAIL_ERROR_REPORTING";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Alias → fully-qualified kind name. Replaces the built-in table.
    pub aliases: AliasTable,
    /// Reporting mask for the diagnostic bridge. Zero suppresses.
    pub error_reporting: i64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            aliases: default_aliases(),
            error_reporting: level::ALL,
        }
    }
}

impl GuardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve configuration from an explicit path, else `GUARDRAIL_CONFIG`,
    /// else defaults; then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let config = match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading guard configuration");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.with_reporting_override(std::env::var(REPORTING_ENV).ok().as_deref())
    }

    fn with_reporting_override(mut self, raw: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            self.error_reporting = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidReporting(raw.to_string()))?;
        }
        Ok(self)
    }

    /// Build a guard with the built-in kinds and this configuration.
    pub fn into_guard(self) -> Guard {
        Guard::new(
            AliasRegistry::new(self.aliases),
            KindRegistry::with_builtins(),
            LegacyErrorBridge::new(self.error_reporting),
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("GUARDRAIL_ERROR_REPORTING must be an integer mask, got {0:?}")]
    InvalidReporting(String),
}
