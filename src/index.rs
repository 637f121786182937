use crate::config::Credentials;
use crate::error::TransportError;
use crate::http;
use crate::image_reference::ImageReference;
use crate::secret_string::SecretString;
use reqwest::{Client, Response, Url};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub static DOCKER_TOKEN_HEADER: &str = "X-Docker-Token";
pub static DOCKER_ENDPOINTS_HEADER: &str = "X-Docker-Endpoints";

/// Registry host and token handed out by the index. Either may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEndpoint {
    pub host: String,
    pub token: SecretString,
}

/// Asks the index for the registry serving `image` and a token for it.
///
/// The status code of the index response is not inspected; whatever headers
/// came back are returned and the caller decides whether they are usable.
pub async fn resolve(
    client: &Client,
    index_url: &Url,
    credentials: Option<&Credentials>,
    image: &ImageReference,
    cancel: &CancellationToken,
) -> Result<RegistryEndpoint, TransportError> {
    let url = http::append_path(index_url, image.images_path())?;

    info!("Requesting registry endpoint and token for {} from {}", image, url);
    let mut request = client.get(url.clone()).header(DOCKER_TOKEN_HEADER, "true");
    if let Some(credentials) = credentials
        .filter(|c| !c.username.is_empty() && !c.password.is_empty())
    {
        debug!("Authenticating against the index as {}", credentials.username);
        request = request.basic_auth(
            &credentials.username,
            Some(credentials.password.expose_secret()),
        );
    }

    let response = http::send(request, &url, cancel).await?;
    debug!("Index {} answered with status {}", url, response.status());

    let endpoint = RegistryEndpoint {
        host: header_value(&response, DOCKER_ENDPOINTS_HEADER),
        token: SecretString::new(header_value(&response, DOCKER_TOKEN_HEADER)),
    };
    if endpoint.host.is_empty() {
        warn!("Index returned no {} header for {}", DOCKER_ENDPOINTS_HEADER, image);
    }
    if endpoint.token.is_empty() {
        warn!("Index returned no {} header for {}", DOCKER_TOKEN_HEADER, image);
    }

    Ok(endpoint)
}

fn header_value(response: &Response, name: &str) -> String {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}
