//! Request body accumulation with a hard byte cap.

use axum::body::Body;
use axum::http::{header, HeaderMap};
use futures_util::StreamExt;

use super::RelayError;

/// Declared `Content-Length`, when present and well-formed.
pub fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Collect the body, failing as soon as more than `limit` bytes arrive.
pub async fn read_capped(body: Body, limit: usize) -> Result<Vec<u8>, RelayError> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(RelayError::PayloadTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}
