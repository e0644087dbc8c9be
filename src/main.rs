//! Customers API server. Settings come from the environment (and `.env`).

use customers_api::{app, load_from_env, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("customers_api=info,tower_http=info")),
        )
        .init();

    let config = load_from_env()?;
    let bind_addr = config.bind_addr;
    let state = AppState::connect(config).await?;

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("customers-api listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
