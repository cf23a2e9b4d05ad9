use chartpilot::config::ServerConfig;
use chartpilot::server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let mut server = Server::new(config).await?;
    tracing::info!(addr = %server.addr(), "ready");

    tokio::signal::ctrl_c()
        .await
        .map_err(|error| error.to_string())?;
    server.shutdown()
}
