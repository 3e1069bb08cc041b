use anyhow::Context;
use brigade::domain::config::ApiConfig;
use brigade::kernel::config::load_config;
use brigade_logger::Logger;
use brigade_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder().name(env!("CARGO_PKG_NAME"));
    if let Some(path) = &cfg.logs.path {
        logger = logger.path(path);
    }
    if cfg.logs.json {
        logger = logger.json();
    }
    // The handle owns the file appender guard; keep it alive until exit.
    let _log = logger.init()?;

    Server::builder().config(cfg).build().await?.run().await
}
