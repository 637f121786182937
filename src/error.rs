use thiserror::Error;

/// The only failure the registry calls distinguish. HTTP error statuses are not
/// part of it: a 4xx/5xx response is still a completed round trip.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
}
