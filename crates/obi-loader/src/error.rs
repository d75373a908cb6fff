//! Document loader error types.

/// Errors from loading a JSON-LD document.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// Transport-level failure (connection refused, TLS, DNS, too many redirects).
    #[error("failed to fetch {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    /// The document does not exist (HTTP 404/410, or missing file).
    #[error("document not found: {uri}")]
    NotFound { uri: String },

    /// The server answered with a non-success status other than not-found.
    #[error("fetching {uri} returned HTTP {status}")]
    Status { uri: String, status: u16 },

    /// The request did not complete within the configured timeout.
    #[error("timed out after {timeout_secs}s fetching {uri}")]
    Timeout { uri: String, timeout_secs: u64 },

    /// The body was fetched but is not JSON.
    #[error("document at {uri} is not valid JSON: {reason}")]
    InvalidJson { uri: String, reason: String },

    /// The URI could not be parsed.
    #[error("invalid URI {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Only `http`, `https` and `file` URIs can be loaded.
    #[error("unsupported URI scheme \"{scheme}\" in {uri}")]
    UnsupportedScheme { uri: String, scheme: String },

    /// Network access was disabled by configuration.
    #[error("network access is disabled; cannot load {uri}")]
    NetworkDisabled { uri: String },

    /// A local file (override or `file://` URI) could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl LoaderError {
    /// Whether this error means the document is absent, as opposed to
    /// unreachable or malformed.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
