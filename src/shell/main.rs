use tracing_subscriber::{EnvFilter, fmt};

use graphql_gateway::shell::config::Config;
use graphql_gateway::shell::lifecycle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    lifecycle::run(&config).await?;
    Ok(())
}
