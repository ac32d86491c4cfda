use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bnb_admin::api::HttpHotelApi;
use bnb_admin::config::Config;
use bnb_admin::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bnb_admin=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let api = HttpHotelApi::new(&config).context("Failed to build hotel API client")?;
    info!("Forwarding to hotel API at {}", config.api_url);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    let state = AppState::new(Arc::new(api), config);
    axum::serve(listener, app(state)).await?;

    Ok(())
}
