//! Analyzer configuration.
//!
//! Bundles the loader settings with the local schema directory and the
//! locator's search scopes. Read from the environment with
//! [`AnalyzerConfig::from_env`]; the CLI overlays its flags on top.

use std::path::PathBuf;

use obi_loader::{ConfigError, LoaderConfig};

/// Sub-object paths searched, in order, for a declared extension property.
/// The empty path is the document itself.
pub fn default_scopes() -> Vec<Vec<String>> {
    vec![
        Vec::new(),
        vec!["badge".to_string()],
        vec!["badge".to_string(), "issuer".to_string()],
    ]
}

/// Configuration for building a [`BadgeAnalyzer`](crate::BadgeAnalyzer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Context/schema document loading.
    pub loader: LoaderConfig,
    /// Extra schemas to register on top of the built-in ones.
    pub schema_dir: Option<PathBuf>,
    /// Locator scopes, first match wins.
    pub scopes: Vec<Vec<String>>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            schema_dir: None,
            scopes: default_scopes(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads everything [`LoaderConfig::from_env`] reads, plus
    /// `OBI_SCHEMA_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            loader: LoaderConfig::from_env()?,
            schema_dir: std::env::var_os("OBI_SCHEMA_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            scopes: default_scopes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scopes_search_document_then_badge_then_issuer() {
        let scopes = default_scopes();
        assert_eq!(scopes.len(), 3);
        assert!(scopes[0].is_empty());
        assert_eq!(scopes[1], ["badge"]);
        assert_eq!(scopes[2], ["badge", "issuer"]);
    }

    #[test]
    fn default_config_has_no_schema_dir() {
        let config = AnalyzerConfig::default();
        assert!(config.schema_dir.is_none());
        assert!(config.loader.allow_network);
    }
}
