//! Reading the badge document and shared loader flags.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use obi_analyzer::AnalyzerConfig;
use obi_loader::config::parse_override;
use serde_json::Value;

/// Flags that shape how contexts and schemas are loaded.
#[derive(Args, Debug, Clone, Default)]
pub struct LoaderArgs {
    /// Directory of additional JSON schemas (`*.json`), searched before
    /// fetching schemas remotely. Overrides `OBI_SCHEMA_DIR`.
    #[arg(long, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Timeout for each remote context or schema fetch, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Never fetch over the network; use built-in and overridden
    /// documents only.
    #[arg(long)]
    pub offline: bool,

    /// Serve a context URI from a local file. Repeatable.
    #[arg(long = "context", value_name = "URI=PATH")]
    pub contexts: Vec<String>,
}

impl LoaderArgs {
    /// Overlay these flags on an environment-derived configuration.
    pub fn apply(&self, config: &mut AnalyzerConfig) -> Result<()> {
        if let Some(dir) = &self.schema_dir {
            config.schema_dir = Some(dir.clone());
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                bail!("--timeout-secs must be greater than zero");
            }
            config.loader.timeout_secs = secs;
        }
        if self.offline {
            config.loader.allow_network = false;
        }
        for raw in &self.contexts {
            let (uri, path) = parse_override(raw).with_context(|| format!("invalid --context {raw}"))?;
            config.loader.overrides.insert(uri, path);
        }
        Ok(())
    }

    /// Environment configuration with these flags applied.
    pub fn config(&self) -> Result<AnalyzerConfig> {
        let mut config =
            AnalyzerConfig::from_env().context("invalid analyzer environment configuration")?;
        self.apply(&mut config)?;
        Ok(config)
    }
}

/// Read a badge document from `path`, or from stdin when `path` is `-`.
///
/// Files ending in `.yaml`/`.yml` are parsed as YAML, everything else as
/// JSON. Stdin is tried as JSON first, then YAML.
pub fn read_document(path: &Path) -> Result<Value> {
    if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read document from stdin")?;
        return parse_document(&raw, None).context("failed to parse document from stdin");
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str());
    parse_document(&raw, extension).with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse document text. `extension` picks the format; `None` sniffs.
pub fn parse_document(raw: &str, extension: Option<&str>) -> Result<Value> {
    match extension {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(raw)?),
        Some(_) => Ok(serde_json::from_str(raw)?),
        None => match serde_json::from_str(raw) {
            Ok(value) => Ok(value),
            Err(json_err) => serde_yaml::from_str(raw)
                .with_context(|| format!("neither JSON ({json_err}) nor YAML")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_by_extension() {
        let doc = parse_document("'@context': http://openbadges.org/context\nuid: a\n", Some("yaml")).unwrap();
        assert_eq!(doc, json!({"@context": "http://openbadges.org/context", "uid": "a"}));
    }

    #[test]
    fn json_by_default_extension() {
        assert!(parse_document("uid: a", Some("json")).is_err());
        assert_eq!(parse_document(r#"{"uid": "a"}"#, Some("json")).unwrap(), json!({"uid": "a"}));
    }

    #[test]
    fn sniffed_input_falls_back_to_yaml() {
        assert_eq!(parse_document(r#"{"uid": 1}"#, None).unwrap(), json!({"uid": 1}));
        assert_eq!(parse_document("uid: 1\n", None).unwrap(), json!({"uid": 1}));
    }

    #[test]
    fn read_document_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn flags_override_config() {
        let args = LoaderArgs {
            schema_dir: Some(PathBuf::from("/schemas")),
            timeout_secs: Some(3),
            offline: true,
            contexts: vec!["urn:ctx=/tmp/ctx.json".to_string()],
        };
        let mut config = AnalyzerConfig::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.schema_dir, Some(PathBuf::from("/schemas")));
        assert_eq!(config.loader.timeout_secs, 3);
        assert!(!config.loader.allow_network);
        assert_eq!(
            config.loader.overrides.get("urn:ctx"),
            Some(&PathBuf::from("/tmp/ctx.json"))
        );
    }

    #[test]
    fn bad_flags_are_rejected() {
        let mut config = AnalyzerConfig::default();
        let zero = LoaderArgs {
            timeout_secs: Some(0),
            ..LoaderArgs::default()
        };
        assert!(zero.apply(&mut config).is_err());

        let malformed = LoaderArgs {
            contexts: vec!["no-separator".to_string()],
            ..LoaderArgs::default()
        };
        assert!(malformed.apply(&mut config).is_err());
    }
}
