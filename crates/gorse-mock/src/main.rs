//! Stand-alone fake Gorse server for manual testing of the CLI.

use anyhow::Result;
use gorse_mock::MockGorse;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "127.0.0.1:8088";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gorse_mock=debug")),
        )
        .init();

    let addr = std::env::var("GORSE_MOCK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let api_key = std::env::var("GORSE_API_KEY").unwrap_or_default();

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "mock gorse listening");
    MockGorse::new(api_key).serve(listener).await?;
    Ok(())
}
