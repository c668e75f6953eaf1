use clap::Parser;
use mqe_frontdoor::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod routes;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();

    info!(listen = %config.listen, dev = config.dev, "Starting mystique");

    let cancel_fut = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    let server = Server::builder()
        .with_listen_address(config.listen)
        .with_templates(config.templates)
        .with_dev(config.dev)
        .build()?;

    server
        .serve(routes::routes())
        .with_graceful_shutdown(cancel_fut)
        .await?;

    Ok(())
}
