//! StoryXcel REST API server binary.
//!
//! Serves the project, friends, asset and integration endpoints along with
//! the story-document region operations, with OpenAPI/Swagger documentation
//! mounted at `/swagger-ui`.

use std::path::Path;
use std::sync::Arc;
use storyxcel_api_rest::{router, AppState};
use storyxcel_core::{constants::DEFAULT_DATA_DIR, CoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the StoryXcel REST API server.
///
/// # Environment Variables
/// - `STORYXCEL_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `STORYXCEL_DATA_DIR`: data storage root (default: "storyxcel_data")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the data directory does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("storyxcel_api_rest=info".parse()?)
                .add_directive("storyxcel_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("STORYXCEL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("STORYXCEL_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.into());

    let data_path = Path::new(&data_dir);
    if !data_path.exists() {
        anyhow::bail!("Data directory does not exist: {}", data_path.display());
    }

    let cfg = Arc::new(CoreConfig::new(data_path.to_path_buf())?);
    cfg.ensure_layout()?;

    tracing::info!("-- Starting StoryXcel REST API on {}", addr);

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
