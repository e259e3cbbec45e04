use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forecast_sync::app::Application;
use forecast_sync::config::Config;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with environment filter support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,forecast_sync=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    info!("Loading environment variables");
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    info!("Starting forecast sync service with config: {:?}", config);

    let application = Application::build(config).await?;
    application.run_until_stopped().await
}
