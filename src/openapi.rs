//! Post-processing of generated OpenAPI documents.
//!
//! protoc's OpenAPI plugin knows nothing about where a service is deployed.
//! After generation the document's `servers` list is replaced with the
//! production and staging endpoints for the service. Every other key is
//! passed through untouched and in its original order.

use crate::error::{Error, Result};
use crate::fsutil::write_file;
use log::debug;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

/// Production endpoint for `service`.
pub fn production_url(service: &str, domain: &str) -> String {
    format!("https://{}.api.{}", service, domain)
}

/// Staging endpoint for `service`.
pub fn staging_url(service: &str, domain: &str) -> String {
    format!("https://{}.api.stage.{}", service, domain)
}

/// Replaces the `servers` entry of a decoded document.
pub fn inject_servers(document: &mut Map<String, Value>, service: &str, domain: &str) {
    document.insert(
        "servers".to_string(),
        json!([
            { "url": production_url(service, domain) },
            { "url": staging_url(service, domain) },
        ]),
    );
}

/// Rewrites the OpenAPI document at `path` with the servers for `service`.
///
/// # Errors
///
/// Fails if the file cannot be read or written, is not valid JSON, or its
/// top level is not an object.
pub fn rewrite_servers(path: &Path, service: &str, domain: &str) -> Result<()> {
    debug!("Injecting servers into {}", path.display());

    let data = fs::read(path).map_err(|e| Error::io("read openapi spec", path, e))?;

    let value: Value = serde_json::from_slice(&data).map_err(|source| Error::Document {
        action: "unmarshal openapi spec",
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Object(mut document) = value else {
        return Err(Error::NotAnObject(path.to_path_buf()));
    };

    inject_servers(&mut document, service, domain);

    let encoded = serde_json::to_vec_pretty(&document).map_err(|source| Error::Document {
        action: "marshal openapi spec",
        path: path.to_path_buf(),
        source,
    })?;

    write_file(path, &encoded)
}
