use crate::cli::Args;
use crate::config::Config;
use crate::container::DockerRuntime;
use crate::state::PollerContext;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod cli;
mod config;
mod container;
mod error;
mod http;
mod image_reference;
mod index;
mod poller;
mod secret_string;
mod state;
mod tags;
mod target;

#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(e) = run().await {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    info!("Starting latest-tag-poller {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_args(args)?;
    let http_client = http::create_client(&config)?;
    let runtime = DockerRuntime::new(config.docker_socket.clone(), config.timeout);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight request");
            interrupt.cancel();
        }
    });

    let ctx = PollerContext {
        config,
        http_client,
        cancel,
    };
    poller::run(&ctx, &runtime, &mut std::io::stdout()).await
}
