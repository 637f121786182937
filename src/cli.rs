use clap::Parser;
use std::path::PathBuf;

/// Looks up the `latest` tag of `<repository>/<image>` through the registry v1 API.
///
/// Without `--registry` the registry endpoint and a token are requested from the
/// Docker index first and the lookup goes over https; with it, the given host is
/// queried directly over plain http.
#[derive(Debug, Default, Parser)]
#[command(name = "latest-tag-poller", version)]
pub struct Args {
    /// Registry host to query directly, skipping endpoint and token resolution
    #[arg(long, env = "POLLER_REGISTRY")]
    pub registry: Option<String>,

    /// Repository namespace, e.g. `library`
    #[arg(long, env = "POLLER_REPOSITORY")]
    pub repository: Option<String>,

    /// Image name, e.g. `nginx`
    #[arg(long, env = "POLLER_IMAGE")]
    pub image: Option<String>,

    /// Container whose image ID and image name are printed before polling
    #[arg(long = "container-id", alias = "containerID", env = "POLLER_CONTAINER_ID")]
    pub container_id: Option<String>,

    /// Username for the Docker index
    #[arg(long, env = "POLLER_USER")]
    pub user: Option<String>,

    /// Password for the Docker index
    #[arg(long, env = "POLLER_PASSWORD", hide_env_values = true)]
    pub pw: Option<String>,

    /// YAML config file, values given on the command line take precedence
    #[arg(long, env = "POLLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Timeout for each registry request
    #[arg(long, env = "POLLER_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    #[arg(long, env = "POLLER_DOCKER_SOCKET")]
    pub docker_socket: Option<PathBuf>,

    /// Base URL of the Docker index issuing registry tokens
    #[arg(long, env = "POLLER_INDEX_URL", hide = true)]
    pub index_url: Option<String>,
}
