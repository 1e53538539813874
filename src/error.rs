use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::server::respond;

/// Failures surfaced by the proxy pipeline.
///
/// Every variant carries the target URL (or the raw path segment that failed
/// to become one) so the client-facing message can always name it. Hitting
/// the rewrite recursion ceiling is not an error: the rewriter returns the
/// manifest untouched instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request path did not decode to an absolute http(s) URL.
    /// No upstream request is attempted for these.
    #[error("Invalid proxy target: {0}")]
    InvalidTarget(String),

    /// Upstream answered with a non-2xx status. `summary` holds the start
    /// of the upstream error body for diagnostics.
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus {
        url: String,
        status: u16,
        summary: String,
    },

    /// The upstream could not be reached at all (DNS, TLS, timeout,
    /// connection reset). There is no upstream status to mirror.
    #[error("Failed to reach {url}: {reason}")]
    Transport { url: String, reason: String },
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client.
    fn message(&self) -> String {
        match self {
            Self::InvalidTarget(raw) => {
                format!("Invalid request: \"{raw}\" does not decode to an absolute http(s) URL")
            }
            Self::UpstreamStatus {
                url,
                status,
                summary,
            } => {
                let explanation = match status {
                    404 => "the resource was not found",
                    500..=599 => "the upstream server failed",
                    _ => "the upstream refused the request",
                };
                if summary.is_empty() {
                    format!("Upstream error {status} fetching {url}: {explanation}")
                } else {
                    format!("Upstream error {status} fetching {url}: {explanation} ({summary})")
                }
            }
            Self::Transport { url, reason } => format!("Could not reach {url}: {reason}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), self.message()).into_response();
        respond::apply_cors(response.headers_mut());
        response
    }
}
