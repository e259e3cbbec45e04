use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::create_router;
use crate::config::Config;
use crate::fetcher::ForecastFetcher;
use crate::keep_alive::KeepAlive;
use crate::pipeline::ForecastPipeline;
use crate::scheduler;
use crate::token_manager::TokenManager;
use crate::uploader::Uploader;

/// Application with all spawned background tasks and server
///
/// This struct holds handles to all running tasks. Tasks run indefinitely.
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
    pub daily_job_scheduler_handle: JoinHandle<()>,
    pub token_refresh_scheduler_handle: JoinHandle<()>,
    pub keep_alive_scheduler_handle: Option<JoinHandle<()>>,
}

/// Wire the fetcher, token manager and uploader into a pipeline
pub fn build_pipeline(config: &Config) -> (ForecastPipeline, TokenManager) {
    let tokens = TokenManager::new(&config.zoho_accounts_url, config.oauth_client());
    let uploader = Uploader::new(
        &config.zoho_creator_url,
        &config.creator_form(),
        config.upload_name.clone(),
        tokens.clone(),
    );
    let fetcher = ForecastFetcher::new(config.forecast_base_url.clone());
    let pipeline = ForecastPipeline::new(
        fetcher,
        uploader,
        config.location_code.clone(),
        config.days_to_fetch,
    );

    (pipeline, tokens)
}

impl Application {
    /// Build and initialize the application
    ///
    /// This creates the pipeline and spawns:
    /// - HTTP liveness server (Axum)
    /// - Daily forecast job at the configured local time
    /// - Token refresh (first refresh immediately)
    /// - Keep-alive pings, when a ping URL is configured
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let (pipeline, tokens) = build_pipeline(&config);

        info!("Spawning background schedulers");

        let token_refresh_scheduler_handle = {
            let tokens = tokens.clone();
            let period = scheduler::interval_from_minutes(config.token_refresh_interval_minutes);
            tokio::spawn(async move {
                scheduler::start_token_refresh_scheduler(tokens, period).await;
            })
        };

        let daily_job_scheduler_handle = {
            let pipeline = pipeline.clone();
            let schedule = config.daily_schedule();
            tokio::spawn(async move {
                scheduler::start_daily_job_scheduler(pipeline, schedule).await;
            })
        };

        let keep_alive_scheduler_handle = match &config.ping_url {
            Some(url) => {
                let keep_alive = KeepAlive::new(url.clone());
                let period = scheduler::interval_from_minutes(config.keep_alive_interval_minutes);
                Some(tokio::spawn(async move {
                    scheduler::start_keep_alive_scheduler(keep_alive, period).await;
                }))
            }
            None => {
                info!("No ping URL configured, keep-alive disabled");
                None
            }
        };

        if config.run_on_startup {
            // No token of its own: the refresh scheduler's first tick or the
            // uploader's 401 retry supplies it
            info!("Running daily job on startup");
            let pipeline = pipeline.clone();
            tokio::spawn(async move {
                scheduler::run_daily_job(&pipeline).await;
            });
        }

        let app = create_router().layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self {
            server_handle,
            daily_job_scheduler_handle,
            token_refresh_scheduler_handle,
            keep_alive_scheduler_handle,
        })
    }

    /// Run until the server stops (which runs indefinitely unless error)
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
