//! Run the forecast pipeline once, outside the daily schedule
//!
//! Usage:
//!   run-once                       # fetch and upload with .env settings
//!   run-once --days 3 --dry-run    # print the CSV for three days, no upload

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forecast_sync::app::build_pipeline;
use forecast_sync::config::Config;
use forecast_sync::uploader::write_export;

#[derive(Parser, Debug)]
#[command(name = "run-once")]
#[command(about = "Fetch the daily forecast once and upload it to Zoho Creator")]
struct Args {
    /// Number of forecast days to fetch (defaults to DAYS_TO_FETCH)
    #[arg(short, long)]
    days: Option<u32>,

    /// Forecast location code (defaults to LOCATION_CODE)
    #[arg(short, long)]
    location: Option<String>,

    /// Print the CSV export to stdout instead of uploading
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(days) = args.days {
        config.days_to_fetch = days;
    }
    if let Some(location) = args.location {
        config.location_code = location;
    }
    info!(
        "Running forecast pipeline once: location={}, days={}, dry_run={}",
        config.location_code, config.days_to_fetch, args.dry_run
    );

    let (pipeline, _tokens) = build_pipeline(&config);

    if args.dry_run {
        let records = pipeline.collect_records().await;
        write_export(&records, std::io::stdout().lock())?;
        info!("Dry run complete, {} records", records.len());
        return Ok(());
    }

    pipeline.run_daily_job().await?;
    info!("Forecast uploaded");

    Ok(())
}
