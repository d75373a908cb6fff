//! Tests for remote and tiered document loading.
//!
//! Uses wiremock for HTTP behaviour (redirects, status codes, timeouts)
//! and tempfile for overrides and `file://` URIs.

use std::io::Write;
use std::time::Duration;

use obi_loader::{
    DocumentLoader, HttpDocumentLoader, LoaderConfig, LoaderError, TieredDocumentLoader,
    OBI_CONTEXT_URI,
};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_loader(timeout_secs: u64) -> HttpDocumentLoader {
    let config = LoaderConfig {
        timeout_secs,
        ..LoaderConfig::default()
    };
    HttpDocumentLoader::new(&config).unwrap()
}

#[tokio::test]
async fn fetches_json_ld_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ctx"))
        .and(header_exists("accept"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"validation": "http://schemas.example/ctx.json"})),
        )
        .mount(&server)
        .await;

    let uri = format!("{}/ctx", server.uri());
    let doc = http_loader(5).load(&uri).await.unwrap();
    assert_eq!(doc.document["validation"], "http://schemas.example/ctx.json");
    assert_eq!(doc.document_url, uri);
}

#[tokio::test]
async fn redirect_is_reported_as_document_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"moved": true})))
        .mount(&server)
        .await;

    let doc = http_loader(5)
        .load(&format!("{}/old", server.uri()))
        .await
        .unwrap();
    assert_eq!(doc.document, json!({"moved": true}));
    assert_eq!(doc.document_url, format!("{}/new", server.uri()));
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = http_loader(5)
        .load(&format!("{}/nope", server.uri()))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err}");
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = http_loader(5)
        .load(&format!("{}/ctx", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoaderError::Status { status: 503, .. }), "got {err}");
}

#[tokio::test]
async fn non_json_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = http_loader(5)
        .load(&format!("{}/ctx", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, LoaderError::InvalidJson { .. }), "got {err}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = http_loader(1)
        .load(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, LoaderError::Timeout { timeout_secs: 1, .. }),
        "got {err}"
    );
}

#[tokio::test]
async fn link_header_context_is_surfaced_for_plain_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "x"}))
                .insert_header(
                    "Link",
                    r#"<http://example.org/ctx>; rel="http://www.w3.org/ns/json-ld#context""#,
                ),
        )
        .mount(&server)
        .await;

    let doc = http_loader(5)
        .load(&format!("{}/doc", server.uri()))
        .await
        .unwrap();
    assert_eq!(doc.context_url.as_deref(), Some("http://example.org/ctx"));
}

#[tokio::test]
async fn file_uri_is_read_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"validation": "urn:schema"}}"#).unwrap();
    let uri = url::Url::from_file_path(file.path()).unwrap().to_string();

    let doc = http_loader(5).load(&uri).await.unwrap();
    assert_eq!(doc.document["validation"], "urn:schema");
    assert_eq!(doc.document_url, uri);
}

#[tokio::test]
async fn tiered_loader_serves_builtins_offline() {
    let loader = TieredDocumentLoader::new(&LoaderConfig::offline()).unwrap();
    let doc = loader.load(OBI_CONTEXT_URI).await.unwrap();
    assert!(doc.document["validation"].is_string());

    let err = loader.load("http://example.org/other").await.unwrap_err();
    assert!(matches!(err, LoaderError::NetworkDisabled { .. }));
}

#[tokio::test]
async fn override_takes_precedence_over_builtin() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"validation": "urn:overridden"}}"#).unwrap();

    let config = LoaderConfig::offline().with_override(OBI_CONTEXT_URI, file.path());
    let loader = TieredDocumentLoader::new(&config).unwrap();
    let doc = loader.load(OBI_CONTEXT_URI).await.unwrap();
    assert_eq!(doc.document["validation"], "urn:overridden");
    assert_eq!(doc.document_url, OBI_CONTEXT_URI);
}

#[tokio::test]
async fn missing_override_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config =
        LoaderConfig::offline().with_override("urn:ctx", dir.path().join("absent.json"));
    let loader = TieredDocumentLoader::new(&config).unwrap();
    let err = loader.load("urn:ctx").await.unwrap_err();
    assert!(err.is_not_found(), "got {err}");
}
