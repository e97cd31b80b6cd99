//! Single-shot JSON POST to the generation backend.
//!
//! Every call builds its own `reqwest::Client` and drops it on return, so no
//! connection outlives the request. One attempt only.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, trace, warn};

#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend answered with something other than 200.
    #[error("backend returned HTTP {0}")]
    Status(u16),
    /// No usable response: connect/timeout failure or undecodable body.
    #[error("backend request failed: {0}")]
    Failed(String),
}

/// POST `body` as JSON to `url` and decode the 200 response as JSON.
pub async fn post_json<B>(url: &str, timeout: Option<Duration>, body: &B) -> Result<Value, TransportError>
where
    B: Serialize + ?Sized,
{
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(|e| {
        error!(error = %e, "failed to build HTTP client");
        TransportError::Failed(format!("failed to build HTTP client: {e}"))
    })?;

    if tracing::enabled!(tracing::Level::TRACE) {
        let json = serde_json::to_string_pretty(body)
            .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
        trace!(%url, payload = %json, "full backend request payload");
    }

    let response = client.post(url).json(body).send().await.map_err(|e| {
        error!(%url, error = %e, is_timeout = e.is_timeout(), "backend HTTP request failed (transport)");
        TransportError::Failed(e.to_string())
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!(%url, status = status.as_u16(), "backend returned non-200 status");
        return Err(TransportError::Status(status.as_u16()));
    }

    let parsed = response.json::<Value>().await.map_err(|e| {
        error!(%url, error = %e, "failed to decode backend response body");
        TransportError::Failed(format!("failed to parse response body: {e}"))
    })?;

    debug!(%url, "received backend response");
    if tracing::enabled!(tracing::Level::TRACE) {
        trace!(response = %parsed, "full backend response payload");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        // Port 1 on loopback is reserved and refuses connections.
        let err = post_json(
            "http://127.0.0.1:1/v1/chat/completions",
            Some(Duration::from_secs(2)),
            &serde_json::json!({}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Failed(_)), "{err:?}");
    }

    #[test]
    fn status_error_display() {
        assert_eq!(TransportError::Status(503).to_string(), "backend returned HTTP 503");
    }
}
