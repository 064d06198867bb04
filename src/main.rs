use anyhow::{Context, Result};
use dotenvy::dotenv;
use joycycles_forecast::{app, config::AppConfig, storage::create_store, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let store = create_store(&config).await.context("failed to open profile store")?;
    let state = AppState::new(store, config.engine.clone());

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("🧠 Server running at {}", addr);

    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
