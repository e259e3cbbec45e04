use std::env;
use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;

use crate::scheduler::{DailySchedule, MAX_INTERVAL_MINUTES};
use crate::token_manager::OAuthClient;
use crate::uploader::CreatorForm;

#[derive(Clone)]
pub struct Config {
    pub zoho_client_id: String,
    pub zoho_client_secret: String,
    pub zoho_refresh_token: String,
    pub zoho_owner: String,
    pub zoho_app: String,
    pub zoho_form: String,
    pub zoho_accounts_url: String,
    pub zoho_creator_url: String,
    pub upload_name: String,
    pub ping_url: Option<String>,
    pub forecast_base_url: String,
    pub location_code: String,
    pub days_to_fetch: u32,
    pub server_host: String,
    pub server_port: u16,
    pub daily_job_hour: u32,
    pub daily_job_minute: u32,
    pub daily_job_utc_offset_minutes: i32,
    pub keep_alive_interval_minutes: u64,
    pub token_refresh_interval_minutes: u64,
    pub run_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            zoho_client_id: env::var("ZOHO_CLIENT_ID")?,
            zoho_client_secret: env::var("ZOHO_CLIENT_SECRET")?,
            zoho_refresh_token: env::var("ZOHO_REFRESH_TOKEN")?,
            zoho_owner: env::var("ZOHO_OWNER")?,
            zoho_app: env::var("ZOHO_APP")?,
            zoho_form: env::var("ZOHO_FORM")?,
            zoho_accounts_url: env::var("ZOHO_ACCOUNTS_URL")
                .unwrap_or_else(|_| "https://accounts.zoho.in".to_string()),
            zoho_creator_url: env::var("ZOHO_CREATOR_URL")
                .unwrap_or_else(|_| "https://creator.zoho.in".to_string()),
            upload_name: env::var("UPLOAD_NAME").unwrap_or_else(|_| "Rayanadu".to_string()),
            ping_url: env::var("RENDER_PING_URL").ok().filter(|url| !url.trim().is_empty()),
            forecast_base_url: env::var("FORECAST_BASE_URL")
                .unwrap_or_else(|_| "https://www.accuweather.com/en/in/rayanapadu".to_string()),
            location_code: env::var("LOCATION_CODE").unwrap_or_else(|_| "1-196832_1_al".to_string()),
            days_to_fetch: parse_var("DAYS_TO_FETCH", 30, |v: &u32| *v > 0),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_var("SERVER_PORT", 8080, |_| true),
            daily_job_hour: parse_var("DAILY_JOB_HOUR", 12, |v: &u32| *v < 24),
            daily_job_minute: parse_var("DAILY_JOB_MINUTE", 15, |v: &u32| *v < 60),
            daily_job_utc_offset_minutes: parse_var("DAILY_JOB_UTC_OFFSET_MINUTES", 330, |v: &i32| {
                v.abs() < 24 * 60
            }),
            keep_alive_interval_minutes: parse_var("KEEP_ALIVE_INTERVAL_MINUTES", 7, |v: &u64| {
                (1..=MAX_INTERVAL_MINUTES).contains(v)
            }),
            token_refresh_interval_minutes: parse_var("TOKEN_REFRESH_INTERVAL_MINUTES", 55, |v: &u64| {
                (1..=MAX_INTERVAL_MINUTES).contains(v)
            }),
            run_on_startup: parse_var("RUN_ON_STARTUP", false, |_| true),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn oauth_client(&self) -> OAuthClient {
        OAuthClient {
            client_id: self.zoho_client_id.clone(),
            client_secret: self.zoho_client_secret.clone(),
            refresh_token: self.zoho_refresh_token.clone(),
        }
    }

    pub fn creator_form(&self) -> CreatorForm {
        CreatorForm {
            owner: self.zoho_owner.clone(),
            app: self.zoho_app.clone(),
            form: self.zoho_form.clone(),
        }
    }

    pub fn daily_schedule(&self) -> DailySchedule {
        DailySchedule {
            hour: self.daily_job_hour,
            minute: self.daily_job_minute,
            utc_offset: FixedOffset::east_opt(self.daily_job_utc_offset_minutes * 60)
                .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid")),
        }
    }
}

// Secrets stay out of the startup log line
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("zoho_client_id", &self.zoho_client_id)
            .field("zoho_client_secret", &"<redacted>")
            .field("zoho_refresh_token", &"<redacted>")
            .field("zoho_owner", &self.zoho_owner)
            .field("zoho_app", &self.zoho_app)
            .field("zoho_form", &self.zoho_form)
            .field("zoho_accounts_url", &self.zoho_accounts_url)
            .field("zoho_creator_url", &self.zoho_creator_url)
            .field("upload_name", &self.upload_name)
            .field("ping_url", &self.ping_url)
            .field("forecast_base_url", &self.forecast_base_url)
            .field("location_code", &self.location_code)
            .field("days_to_fetch", &self.days_to_fetch)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("daily_job_hour", &self.daily_job_hour)
            .field("daily_job_minute", &self.daily_job_minute)
            .field("daily_job_utc_offset_minutes", &self.daily_job_utc_offset_minutes)
            .field("keep_alive_interval_minutes", &self.keep_alive_interval_minutes)
            .field("token_refresh_interval_minutes", &self.token_refresh_interval_minutes)
            .field("run_on_startup", &self.run_on_startup)
            .finish()
    }
}

/// Parse an optional variable, falling back to `default` when unset,
/// unparsable, or rejected by `valid`
fn parse_var<T: FromStr>(name: &str, default: T, valid: impl Fn(&T) -> bool) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| valid(v))
        .unwrap_or(default)
}
