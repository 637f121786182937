use crate::container::ContainerRuntime;
use crate::index;
use crate::secret_string::SecretString;
use crate::state::PollerContext;
use crate::tags;
use crate::target::{RegistrySource, RegistryTarget};
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{info, warn};

/// One pass: inspect the container, pick the registry, poll the latest tag once.
///
/// Container details and the raw registry body are written to `out`.
pub async fn run<R, W>(ctx: &PollerContext, runtime: &R, out: &mut W) -> Result<()>
where
    R: ContainerRuntime,
    W: Write,
{
    let config = &ctx.config;

    match config.container_id.as_deref() {
        Some(container_id) => {
            let container = runtime
                .inspect_image(container_id)
                .await
                .context("Failed to read image of container")?;
            info!(
                "Container {} runs image {} ({})",
                container_id, container.image_name, container.image_id
            );
            write!(
                out,
                "\nimageID: {}\n\nimagename: {}\n",
                container.image_id, container.image_name
            )
            .context("Failed to write container details")?;
        }
        None => warn!("No container ID configured, skipping container inspection"),
    }

    let (target, token) = match RegistrySource::from_config(config) {
        RegistrySource::Explicit(host) => {
            info!("Using configured registry {} without token", host);
            (
                RegistryTarget::direct(host, &config.image),
                SecretString::default(),
            )
        }
        RegistrySource::Index => {
            let endpoint = index::resolve(
                &ctx.http_client,
                &config.index_url,
                config.credentials.as_ref(),
                &config.image,
                &ctx.cancel,
            )
            .await
            .context("Failed to resolve registry endpoint and token")?;
            info!("Index resolved registry endpoint {}", endpoint.host);
            (
                RegistryTarget::resolved(&endpoint.host, &config.image),
                endpoint.token,
            )
        }
    };

    let url = target.url()?;
    let body = tags::poll(&ctx.http_client, &url, &token, &ctx.cancel)
        .await
        .with_context(|| format!("Failed to poll latest tag of {}", config.image))?;

    out.write_all(&body)
        .and_then(|()| out.write_all(b"\n"))
        .context("Failed to write registry response")?;
    Ok(())
}
