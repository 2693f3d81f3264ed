//! Metadata-only probe for the total resource size.

use reqwest::{header, Client};

use crate::error::SizeProbeError;

/// Resolve the total size of `url` from the Content-Length header of a HEAD
/// response. Single attempt, no retry.
pub(crate) async fn content_length(client: &Client, url: &str) -> Result<u64, SizeProbeError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(SizeProbeError::Network)?;

    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .ok_or(SizeProbeError::Unavailable)
}
