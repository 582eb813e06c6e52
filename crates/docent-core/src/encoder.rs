//! Transport-safe encoding of document bytes.
//!
//! Payloads are standard, padded base64 with no `data:` URI metadata.

use crate::document::Document;
use crate::error::{DocentError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

/// Reads `document` and returns its bytes as a base64 payload.
///
/// # Errors
///
/// Propagates [`DocentError::Read`] when the byte source cannot be read.
pub async fn encode(document: &Document) -> Result<String> {
    let bytes = document.read_bytes().await?;
    tracing::debug!(
        document = document.name(),
        bytes = bytes.len(),
        "Encoding document"
    );
    Ok(encode_bytes(&bytes))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decodes a payload produced by [`encode`].
///
/// A leading data URI header (`data:application/pdf;base64,`) is tolerated
/// and stripped.
pub fn decode(payload: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD
        .decode(strip_data_uri(payload))
        .map_err(|e| DocentError::Serialization {
            format: "base64".to_string(),
            message: e.to_string(),
        })
}

/// Returns only the payload part of a data URI, or the input unchanged.
pub fn strip_data_uri(text: &str) -> &str {
    match text.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(text, |(_, payload)| payload),
        None => text,
    }
}
