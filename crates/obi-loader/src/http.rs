//! # Remote and File Document Loading
//!
//! Fetches `http`/`https` documents with `reqwest`, following redirects up
//! to the configured limit and reporting the final URL as the document URL.
//! `file://` URIs are read from disk.
//!
//! ## Timeout
//!
//! Every request is bounded by [`LoaderConfig::timeout_secs`]. No retries
//! are attempted; a failed fetch is terminal for that one document.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, LINK};
use reqwest::StatusCode;
use url::Url;

use crate::config::LoaderConfig;
use crate::document::{DocumentLoader, RemoteDocument};
use crate::error::LoaderError;

/// `Accept` header: JSON-LD first, plain JSON as a fallback.
const ACCEPT_JSON_LD: &str = "application/ld+json, application/json;q=0.9, */*;q=0.1";

/// Link relation advertising a JSON-LD context for plain-JSON responses.
const JSON_LD_CONTEXT_REL: &str = "http://www.w3.org/ns/json-ld#context";

/// Loads documents over HTTP(S) and from the local filesystem.
#[derive(Debug, Clone)]
pub struct HttpDocumentLoader {
    client: reqwest::Client,
    timeout_secs: u64,
    allow_network: bool,
}

impl HttpDocumentLoader {
    /// Create a loader from configuration.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON_LD));
                headers
            })
            .build()
            .map_err(|e| LoaderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
            allow_network: config.allow_network,
        })
    }

    async fn fetch_http(&self, uri: &str, url: Url) -> Result<RemoteDocument, LoaderError> {
        if !self.allow_network {
            return Err(LoaderError::NetworkDisabled {
                uri: uri.to_string(),
            });
        }

        tracing::debug!(uri, "fetching remote document");
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                LoaderError::Timeout {
                    uri: uri.to_string(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                LoaderError::Fetch {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(LoaderError::NotFound {
                uri: uri.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LoaderError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let document_url = resp.url().to_string();
        if document_url != uri {
            tracing::debug!(uri, document_url = %document_url, "followed redirect");
        }
        let context_url = if is_json_ld(resp.headers()) {
            None
        } else {
            resp.headers()
                .get_all(LINK)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .find_map(linked_context)
        };

        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                LoaderError::Timeout {
                    uri: uri.to_string(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                LoaderError::Fetch {
                    uri: uri.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;
        let document = parse_json(uri, &body)?;

        Ok(RemoteDocument {
            context_url,
            document,
            document_url,
        })
    }
}

#[async_trait]
impl DocumentLoader for HttpDocumentLoader {
    async fn load(&self, uri: &str) -> Result<RemoteDocument, LoaderError> {
        let url = Url::parse(uri).map_err(|e| LoaderError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => self.fetch_http(uri, url).await,
            "file" => {
                let path = url.to_file_path().map_err(|_| LoaderError::InvalidUri {
                    uri: uri.to_string(),
                    reason: "not a local file path".to_string(),
                })?;
                let document = read_json_file(&path).await?;
                Ok(RemoteDocument::new(document, uri))
            }
            scheme => Err(LoaderError::UnsupportedScheme {
                uri: uri.to_string(),
                scheme: scheme.to_string(),
            }),
        }
    }
}

/// Read and parse a JSON file.
pub async fn read_json_file(path: &Path) -> Result<serde_json::Value, LoaderError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_json(&path.display().to_string(), &content)
}

fn parse_json(uri: &str, body: &str) -> Result<serde_json::Value, LoaderError> {
    serde_json::from_str(body).map_err(|e| LoaderError::InvalidJson {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}

fn is_json_ld(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/ld+json"))
}

/// Extract the target of a `Link` header entry whose relation is the
/// JSON-LD context relation.
fn linked_context(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let has_rel = parts.any(|p| {
            let p = p.trim();
            p == format!("rel=\"{JSON_LD_CONTEXT_REL}\"") || p == format!("rel={JSON_LD_CONTEXT_REL}")
        });
        has_rel.then(|| target.to_string())
    })
}
