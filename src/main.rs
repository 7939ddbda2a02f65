//! Server binary: reads settings, migrates the schema, serves the API.

use tokio::net::TcpListener;
use tracker_api::{app, apply_migrations, connect, resolve, tracker_catalog, AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tracker_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let model = resolve(&tracker_catalog(&config.schema))?;
    let pool = connect(&config).await?;
    apply_migrations(&pool, &model).await?;

    let state = AppState::new(pool, model);
    let router = app(state, config.body_limit_bytes)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
