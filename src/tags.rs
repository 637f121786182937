use crate::error::TransportError;
use crate::http;
use crate::secret_string::SecretString;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Fetches `url` once and returns the raw body.
///
/// Non-success statuses are logged but the body is returned all the same.
pub async fn poll(
    client: &Client,
    url: &Url,
    token: &SecretString,
    cancel: &CancellationToken,
) -> Result<Bytes, TransportError> {
    info!("Polling latest tag from URL {}", url);
    let mut request = client.get(url.clone());
    if !token.is_empty() {
        request = request.header(AUTHORIZATION, format!("Token {}", token.expose_secret()));
    }

    let response = http::send(request, url, cancel).await?;
    let status = response.status();
    if !status.is_success() {
        warn!("Registry returned status {} for {}", status, url);
    }

    http::read_body(response, url, cancel).await
}
