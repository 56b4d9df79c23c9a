use anyhow::Context;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use shoprec_api::{
    config::Config,
    db,
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url(), config.db_max_connections)
        .await
        .context("Database connection failed")?;
    db::run_migrations(&pool).await?;
    tracing::info!(host = %config.db_host, "Connected to database");

    let state = AppState::from_config(pool, &config)?;

    let mut app = create_router(state);
    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir, "Serving browser UI");
        app = app.fallback_service(ServeDir::new(dir));
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
