use std::time::Duration;

use axum::http::HeaderMap;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use url::Url;

use crate::{Error, Result};

/// How much of an upstream error body is kept for diagnostics.
const ERROR_SUMMARY_CHARS: usize = 200;

/// Everything the pipeline needs from an upstream answer.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// Content-Type value as sent by upstream, empty when absent.
    pub content_type: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// HTTP client for upstream fetches. Redirects are followed, so the body
/// handed back always belongs to the final hop.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Fetch `target` with the prepared header set.
    ///
    /// Non-2xx answers become [`Error::UpstreamStatus`] carrying the status
    /// and the start of the upstream body; failures to get any answer at
    /// all (DNS, TLS, timeout) become [`Error::Transport`].
    pub async fn fetch(&self, target: &Url, headers: HeaderMap) -> Result<UpstreamResponse> {
        let response = self
            .client
            .get(target.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach {}: {}", target, e);
                Error::Transport {
                    url: target.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let summary: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(ERROR_SUMMARY_CHARS)
                .collect();
            tracing::warn!("Upstream returned HTTP {} for {}", status, target);
            return Err(Error::UpstreamStatus {
                url: target.to_string(),
                status: status.as_u16(),
                summary,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let headers = response.headers().clone();

        let body = response.bytes().await.map_err(|e| Error::Transport {
            url: target.to_string(),
            reason: e.to_string(),
        })?;

        Ok(UpstreamResponse {
            status,
            content_type,
            headers,
            body,
        })
    }
}
