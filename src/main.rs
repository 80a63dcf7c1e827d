use bff_relay::modules;
use bff_relay::proxy;

#[tokio::main]
async fn main() -> Result<(), String> {
    modules::logger::init_logger();

    // Missing or malformed upstream configuration is fatal: without a base
    // URL no route can be served.
    let config = modules::UpstreamConfig::from_env().map_err(|e| e.to_string())?;
    tracing::info!("forwarding to upstream at {}", config.api_url());

    let upstream = proxy::upstream::UpstreamClient::new().map_err(|e| e.to_string())?;
    let state = proxy::AppState::new(config, upstream);

    let bind_address = modules::config::bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| format!("failed to bind {}: {}", bind_address, e))?;

    tracing::info!("bff-relay listening at http://{}", bind_address);

    proxy::server::serve(listener, state)
        .await
        .map_err(|e| e.to_string())
}
