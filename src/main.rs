use anyhow::Context;
use solution_gallery::app;
use solution_gallery::state::{AppConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Log initialized");

    let config = AppConfig::from_env()?;
    tracing::info!(
        "Search index {:?} at {} (empty query policy: {})",
        config.search_index,
        config.search_host,
        config.empty_query_policy.as_str()
    );
    tracing::info!("Like status backend at {}", config.api_url);
    tracing::info!(
        "Sessions expire after {}s idle (max {})",
        config.session_limits.idle_ttl.as_secs(),
        config.session_limits.max_sessions
    );
    if config.user_id.is_none() {
        tracing::warn!("GALLERY_USER_ID is not set. Like status will not be loaded.");
    }

    let http_client = reqwest::Client::builder()
        .user_agent("SolutionGallery/0.1")
        .build()
        .context("Failed to build HTTP client")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app_state = AppState::new(config, http_client);

    tracing::info!("Solution gallery listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let router = app(app_state);
    axum::serve(listener, router).await?;

    Ok(())
}
