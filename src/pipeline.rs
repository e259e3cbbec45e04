use std::time::Duration;

use backon::{BackoffBuilder, ConstantBuilder};
use tracing::{debug, info, instrument, warn};

use crate::extractor::ForecastRecord;
use crate::fetcher::ForecastFetcher;
use crate::uploader::{UploadError, Uploader};

/// Base pause between page requests; jitter adds up to the same again
pub const DEFAULT_REQUEST_PAUSE: Duration = Duration::from_millis(500);

/// Pauses between page requests, each uniform in `[base, 2 * base)`
pub fn request_pauses(base: Duration, times: usize) -> impl Iterator<Item = Duration> {
    ConstantBuilder::default()
        .with_delay(base)
        .with_max_times(times)
        .with_jitter()
        .build()
}

/// Daily forecast pipeline
///
/// Fetches `days_to_fetch` consecutive forecast days one after another,
/// keeps the days whose page carried a date, and uploads them as a single
/// table. A failed day is logged and skipped; only the upload can fail the run.
#[derive(Clone)]
pub struct ForecastPipeline {
    fetcher: ForecastFetcher,
    uploader: Uploader,
    location_code: String,
    days_to_fetch: u32,
    request_pause: Duration,
}

impl ForecastPipeline {
    pub fn new(
        fetcher: ForecastFetcher,
        uploader: Uploader,
        location_code: String,
        days_to_fetch: u32,
    ) -> Self {
        Self {
            fetcher,
            uploader,
            location_code,
            days_to_fetch,
            request_pause: DEFAULT_REQUEST_PAUSE,
        }
    }

    /// Override the base pause between page requests (zero disables waiting)
    pub fn with_request_pause(mut self, pause: Duration) -> Self {
        self.request_pause = pause;
        self
    }

    /// Fetch every day in `1..=days_to_fetch`, keeping dated records in order
    #[instrument(skip(self), fields(location_code = %self.location_code, days = self.days_to_fetch))]
    pub async fn collect_records(&self) -> Vec<ForecastRecord> {
        let mut pauses = request_pauses(self.request_pause, self.days_to_fetch as usize);

        let mut records = Vec::new();
        let mut failed_days = 0;

        for day in 1..=self.days_to_fetch {
            match self.fetcher.fetch_day(&self.location_code, day).await {
                Ok(record) if record.has_date() => {
                    debug!("Day {}: {}", day, record.date);
                    records.push(record);
                }
                Ok(_) => {
                    warn!("Day {}: page has no date, discarding record", day);
                }
                Err(e) => {
                    warn!("Error fetching day {}, skipping: {}", day, e);
                    failed_days += 1;
                }
            }

            let pause = pauses.next().unwrap_or(self.request_pause);
            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
        }

        if failed_days > 0 {
            warn!("{} of {} days failed to fetch", failed_days, self.days_to_fetch);
        }
        info!("Collected {} records from {} days", records.len(), self.days_to_fetch);

        records
    }

    /// Run the daily job: collect all days, then upload exactly once
    #[instrument(skip(self))]
    pub async fn run_daily_job(&self) -> Result<(), UploadError> {
        info!("Running daily forecast job");
        let records = self.collect_records().await;

        if records.is_empty() {
            warn!("No forecast records collected, uploading empty table");
        }

        info!("All days fetched, uploading");
        self.uploader.upload(&records).await
    }
}
