use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::{debug, instrument};

use crate::extractor::{self, ForecastRecord};
use crate::fetch_error::FetchError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct ForecastFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl ForecastFetcher {
    /// Create a fetcher for pages under `base_url`
    /// Example: https://www.accuweather.com/en/in/rayanapadu
    pub fn new(base_url: String) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));

        Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Daily forecast page for one location and day offset (1 = today)
    pub fn day_url(&self, location_code: &str, day: u32) -> String {
        format!(
            "{}/{location_code}/daily-weather-forecast/{location_code}?day={day}",
            self.base_url
        )
    }

    #[instrument(skip(self), fields(location_code = %location_code, day = %day))]
    pub async fn fetch_day(&self, location_code: &str, day: u32) -> Result<ForecastRecord, FetchError> {
        let url = self.day_url(location_code, day);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!("Received HTTP response with status: {}", status);
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }

        let html = response.text().await?;
        debug!("Retrieved HTML content, size: {} bytes", html.len());

        Ok(extractor::extract(&html))
    }
}
