use std::net::SocketAddr;

use tokio::net::TcpListener;

use financial_monitor::config::ServiceConfig;
use financial_monitor::router::create_router;
use financial_monitor::state::AppState;
use financial_monitor::SERVICE_VERSION;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    tracing::info!(version = SERVICE_VERSION, "Starting financial monitor service");

    let config = ServiceConfig::from_env();
    let state = AppState::new(&config);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
