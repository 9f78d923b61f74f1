use std::io::Read;

use anyhow::Result;
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use scantrail_domain::{BatchRequest, RuntimeConfig};

/// Caller authorization is a pre-validated fact by the time any command
/// or query runs: handlers consume only this boolean. An instance
/// without a configured token is open.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_api_key(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Decode an ingest body into a batch envelope, transparently handling
/// gzip-compressed uploads from bandwidth-constrained devices.
pub fn parse_batch(headers: &HeaderMap, body: &[u8]) -> Result<BatchRequest> {
    let content = maybe_gunzip(headers, body)?;
    let request: BatchRequest = serde_json::from_str(&content)?;
    Ok(request)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("") == "gzip" {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("X-Api-Key")?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}
