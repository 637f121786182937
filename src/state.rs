use crate::config::Config;
use tokio_util::sync::CancellationToken;

pub struct PollerContext {
    pub(crate) config: Config,
    pub(crate) http_client: reqwest::Client,
    pub(crate) cancel: CancellationToken,
}
