use anyhow::Context;
use clap::Parser;
use festfriend_server::logging::init_logging;
use festfriend_server::{Args, GroupServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(Args::parse());
    init_logging()?;

    log::info!(
        "festfriend-server {} (argon2 m={} KiB, t={}, p={})",
        festfriend_server::get_version(),
        config.credential_params.memory_kib,
        config.credential_params.iterations,
        config.credential_params.parallelism
    );

    let server = GroupServer::new(config).context("invalid server configuration")?;
    let running = server.start().await.context("failed to start group server")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    server.stop();

    running.wait().await.context("group server terminated abnormally")?;
    log::info!("Group server stopped");
    Ok(())
}
