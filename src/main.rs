use tokio::net::TcpListener;

use sms_relay::server::{self, AppState};
use sms_relay::{GatewayClient, RelayConfig, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RelayConfig::from_env()?;
    let _guard = logging::init(config.error_log())?;

    tracing::info!(
        bind_address = %config.bind_address(),
        gateway_url = %config.gateway_url(),
        error_log = %config.error_log().display(),
        "Configuration loaded"
    );

    let gateway = GatewayClient::new(config.credentials().clone(), config.gateway_url().clone());

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(port = config.port(), "Starting server");

    server::serve(listener, AppState::new(gateway)).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
