use crate::config::Config;
use crate::error::TransportError;
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::{Certificate, Client, RequestBuilder, Response, Url};
use std::fs;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub fn create_client(config: &Config) -> Result<Client> {
    info!(
        "Initializing registry HTTP client with a request timeout of {:?}",
        config.timeout
    );
    // System certificates are loaded automatically with rustls-tls-native-roots
    let mut client_builder = Client::builder().timeout(config.timeout);

    for file_path in &config.tls.ca_certificate_paths {
        let file_content = fs::read(file_path)
            .with_context(|| format!("Failed to read file {}", file_path.display()))?;
        let cert = Certificate::from_pem(&file_content).context("Failed to parse certificate")?;
        client_builder = client_builder.add_root_certificate(cert);
    }

    client_builder.build().context("Failed to build HTTP client")
}

/// Appends escaped `segments` to the path of `base`, keeping any prefix it already has.
pub fn append_path<I>(base: &Url, segments: I) -> Result<Url, TransportError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| TransportError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot carry a path".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends the request unless `cancel` fires first.
pub async fn send(
    request: RequestBuilder,
    url: &Url,
    cancel: &CancellationToken,
) -> Result<Response, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled { url: url.to_string() }),
        result = request.send() => result.map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        }),
    }
}

/// Reads the whole body as received. The response, and with it the connection, is dropped on every path.
pub async fn read_body(
    response: Response,
    url: &Url,
    cancel: &CancellationToken,
) -> Result<Bytes, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled { url: url.to_string() }),
        result = response.bytes() => result.map_err(|source| TransportError::Body {
            url: url.to_string(),
            source,
        }),
    }
}
