use anyhow::Result;
use chirp_language_service::{config::Config, db::Database, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chirp_language_service=info".parse()?),
        )
        .init();

    info!("Starting language-change service");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Open the user store
    let db = Database::new(&config.database_path)?;
    info!("User store ready at {}", config.database_path);

    // Wire the service and the HTTP surface
    let state = server::AppState::from_config(&config, db)?;
    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
