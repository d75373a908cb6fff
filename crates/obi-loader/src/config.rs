//! Document loader configuration.
//!
//! Defaults allow network fetches with a 30 second timeout. Override via
//! environment variables or explicit construction for offline/testing use.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default redirect limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

const TIMEOUT_VAR: &str = "OBI_LOADER_TIMEOUT_SECS";

/// Configuration for loading context and schema documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Request timeout in seconds. Bounds every remote fetch so an
    /// unreachable URI settles as a failure instead of hanging.
    pub timeout_secs: u64,
    /// Maximum number of HTTP redirects to follow.
    pub max_redirects: usize,
    /// `User-Agent` header sent with remote requests.
    pub user_agent: String,
    /// Whether `http`/`https` URIs may be fetched at all.
    pub allow_network: bool,
    /// Extra URI → local file mappings, consulted before the built-in table.
    pub overrides: BTreeMap<String, PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("obi-analyzer/{}", env!("CARGO_PKG_VERSION")),
            allow_network: true,
            overrides: BTreeMap::new(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `OBI_LOADER_TIMEOUT_SECS` (default: 30, must be non-zero)
    /// - `OBI_LOADER_MAX_REDIRECTS` (default: 10)
    /// - `OBI_ALLOW_NETWORK` (`true`/`false`/`1`/`0`, default: true)
    /// - `OBI_CONTEXT_OVERRIDES` (`uri=path;uri=path`, default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let timeout_secs = env_parse(TIMEOUT_VAR, defaults.timeout_secs)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(TIMEOUT_VAR.to_string(), "0".to_string()));
        }
        Ok(Self {
            timeout_secs,
            max_redirects: env_parse("OBI_LOADER_MAX_REDIRECTS", defaults.max_redirects)?,
            allow_network: env_bool("OBI_ALLOW_NETWORK", defaults.allow_network)?,
            overrides: match std::env::var("OBI_CONTEXT_OVERRIDES") {
                Ok(raw) => parse_overrides(&raw)?,
                Err(_) => BTreeMap::new(),
            },
            user_agent: defaults.user_agent,
        })
    }

    /// An offline configuration: built-ins and overrides only.
    pub fn offline() -> Self {
        Self {
            allow_network: false,
            ..Self::default()
        }
    }

    /// Add one URI → file override.
    pub fn with_override(mut self, uri: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(uri.into(), path.into());
        self
    }
}

/// Parse a single `uri=path` override.
pub fn parse_override(raw: &str) -> Result<(String, PathBuf), ConfigError> {
    // Split on the last '=' so URIs with query strings survive.
    let (uri, path) = raw
        .rsplit_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(raw.to_string()))?;
    let (uri, path) = (uri.trim(), path.trim());
    if uri.is_empty() || path.is_empty() {
        return Err(ConfigError::InvalidOverride(raw.to_string()));
    }
    Ok((uri.to_string(), PathBuf::from(path)))
}

/// Parse a `uri=path;uri=path` override list. Empty items are ignored.
pub fn parse_overrides(raw: &str) -> Result<BTreeMap<String, PathBuf>, ConfigError> {
    raw.split(';')
        .filter(|item| !item.trim().is_empty())
        .map(parse_override)
        .collect()
}

fn env_parse<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

fn env_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(var.to_string(), raw)),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used
    /// (variable name, raw value).
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),

    /// A context override is not of the form `URI=PATH`.
    #[error("invalid context override {0:?}; expected URI=PATH")]
    InvalidOverride(String),
}
