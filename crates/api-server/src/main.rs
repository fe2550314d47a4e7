//! API Server Binary Entry Point

use id_doc_api_server::{start_server, ApiState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "id_doc_api_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.addr.clone();

    let state = ApiState::from_config(config);

    tracing::info!("Starting US Document Parsing API Server");
    start_server(&addr, state).await?;

    Ok(())
}
