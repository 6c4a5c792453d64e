//! Error kinds and helpers shared by the integration tests.

use std::sync::Once;

use serde::Serialize;
use wari::Details;

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    #[allow(dead_code)]
    Post,
}

#[derive(Debug, Clone, Serialize, Details)]
pub struct HttpError {
    pub method: Method,
    pub url: String,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize, Details)]
pub struct JsonError {
    pub text: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    #[allow(dead_code)]
    Write,
}

#[derive(Debug, Clone, Serialize, Details)]
#[details(tag = "FileError")]
pub struct FileFailure {
    pub operation: Operation,
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub error: String,
}

pub fn http_error(status: u16) -> HttpError {
    HttpError {
        method: Method::Get,
        url: "https://example.com/api".into(),
        status,
    }
}

pub fn json_error(text: &str) -> JsonError {
    JsonError { text: text.into() }
}

static TRACING: Once = Once::new();

/// Installs a test-friendly subscriber once; honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
