use anyhow::{Context, Result};
use bollard::Docker;
use bollard::container::InspectContainerOptions;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImage {
    pub image_id: String,
    pub image_name: String,
}

pub trait ContainerRuntime {
    async fn inspect_image(&self, container_id: &str) -> Result<ContainerImage>;
}

/// Docker (or a compatible engine) reached through its local management socket.
pub struct DockerRuntime {
    socket: PathBuf,
    timeout: Duration,
}

impl DockerRuntime {
    pub fn new(socket: PathBuf, timeout: Duration) -> Self {
        Self { socket, timeout }
    }

    fn connect(&self) -> Result<Docker> {
        let socket = self
            .socket
            .to_str()
            .context("Docker socket path is not valid UTF-8")?;
        debug!("Connecting to container runtime at {}", socket);
        Docker::connect_with_socket(socket, self.timeout.as_secs(), bollard::API_DEFAULT_VERSION)
            .with_context(|| format!("Failed to connect to container runtime at {}", socket))
    }
}

impl ContainerRuntime for DockerRuntime {
    async fn inspect_image(&self, container_id: &str) -> Result<ContainerImage> {
        let docker = self.connect()?;
        let container = docker
            .inspect_container(container_id, None::<InspectContainerOptions>)
            .await
            .with_context(|| format!("Failed to inspect container {}", container_id))?;

        Ok(ContainerImage {
            image_id: container.image.unwrap_or_default(),
            image_name: container
                .config
                .and_then(|config| config.image)
                .unwrap_or_default(),
        })
    }
}
