use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use tokio::time::{self, Instant};
use tracing::{debug, error, info, instrument};

use crate::keep_alive::KeepAlive;
use crate::pipeline::ForecastPipeline;
use crate::token_manager::TokenManager;

/// Wall-clock time of day, in a fixed UTC offset, at which the pipeline runs
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    pub hour: u32,
    pub minute: u32,
    pub utc_offset: FixedOffset,
}

impl DailySchedule {
    /// Next run strictly after `now`, or `None` if hour/minute are not a valid time
    pub fn next_run(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_daily_run(now, self.hour, self.minute, self.utc_offset)
    }
}

/// Next occurrence of `hour:minute` in `offset` that lies strictly after `now`
pub fn next_daily_run(
    now: DateTime<Utc>,
    hour: u32,
    minute: u32,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    let run_time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let local_now = now.with_timezone(&offset);
    let today = offset
        .from_local_datetime(&local_now.date_naive().and_time(run_time))
        .single()?;

    let next = if today > local_now {
        today
    } else {
        today + TimeDelta::days(1)
    };

    Some(next.with_timezone(&Utc))
}

#[instrument(skip(pipeline), fields(hour = schedule.hour, minute = schedule.minute))]
pub async fn start_daily_job_scheduler(pipeline: ForecastPipeline, schedule: DailySchedule) {
    info!(
        "Daily job scheduler started for {:02}:{:02} (UTC{})",
        schedule.hour, schedule.minute, schedule.utc_offset
    );

    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_run(now) else {
            error!(
                "Invalid daily job time {:02}:{:02}, scheduler stopped",
                schedule.hour, schedule.minute
            );
            return;
        };

        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        info!(
            "Next daily job at {} (in {} minutes)",
            next.with_timezone(&schedule.utc_offset),
            wait.as_secs() / 60
        );
        time::sleep(wait).await;

        run_daily_job(&pipeline).await;
    }
}

/// Run the pipeline once and log the outcome
pub async fn run_daily_job(pipeline: &ForecastPipeline) {
    match pipeline.run_daily_job().await {
        Ok(()) => info!("Daily job completed"),
        Err(e) => error!("Daily job failed: {}", e),
    }
}

/// Longest accepted scheduler interval (one week)
pub const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Scheduler period for an interval configured in minutes, capped at `MAX_INTERVAL_MINUTES`
pub fn interval_from_minutes(minutes: u64) -> Duration {
    Duration::from_secs(minutes.min(MAX_INTERVAL_MINUTES).saturating_mul(60))
}

/// Refresh the access token every `period`, starting immediately
#[instrument(skip(tokens), fields(period_secs = period.as_secs()))]
pub async fn start_token_refresh_scheduler(tokens: TokenManager, period: Duration) {
    let mut interval = time::interval(period);

    info!("Token refresh scheduler started with {:?} interval", period);

    loop {
        interval.tick().await;
        debug!("Scheduler tick - refreshing access token");

        if let Err(e) = tokens.refresh().await {
            error!("Failed to refresh access token: {}", e);
        }
    }
}

/// Ping the service's public URL every `period`, first ping after one period
#[instrument(skip(keep_alive), fields(period_secs = period.as_secs()))]
pub async fn start_keep_alive_scheduler(keep_alive: KeepAlive, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);

    info!("Keep-alive scheduler started with {:?} interval", period);

    loop {
        interval.tick().await;
        keep_alive.ping().await;
    }
}
