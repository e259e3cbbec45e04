use std::time::Duration;

use tracing::{info, instrument, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pings the service's own public URL so the host does not idle it out
#[derive(Clone)]
pub struct KeepAlive {
    client: reqwest::Client,
    url: String,
}

impl KeepAlive {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            url,
        }
    }

    /// Send one ping. Failures are logged and never returned.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn ping(&self) {
        info!("Pinging {}", self.url);
        match self.client.get(&self.url).send().await {
            Ok(response) => info!("Keep-alive response: {}", response.status()),
            Err(e) => warn!("Keep-alive failed: {}", e),
        }
    }
}
