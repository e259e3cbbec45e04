use std::io::Write;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::extractor::{ForecastRecord, EXPORT_HEADER};
use crate::token_manager::{TokenError, TokenManager};
use crate::utils::truncate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const EXPORT_FILE_NAME: &str = "forecast.csv";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export: {0}")]
    Csv(#[from] csv::Error),

    #[error("Token refresh failed: {0}")]
    Token(#[from] TokenError),

    #[error("Upload rejected with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

/// Owner/application/form triple addressing one Creator form
#[derive(Debug, Clone)]
pub struct CreatorForm {
    pub owner: String,
    pub app: String,
    pub form: String,
}

/// Posts the forecast table to a Zoho Creator form
#[derive(Clone)]
pub struct Uploader {
    client: reqwest::Client,
    upload_url: String,
    upload_name: String,
    tokens: TokenManager,
}

impl Uploader {
    /// `creator_url` is the Creator host, e.g. https://creator.zoho.in
    pub fn new(creator_url: &str, form: &CreatorForm, upload_name: String, tokens: TokenManager) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            upload_url: format!(
                "{}/api/v2/{}/{}/form/{}",
                creator_url.trim_end_matches('/'),
                form.owner,
                form.app,
                form.form
            ),
            upload_name,
            tokens,
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Upload records as one CSV table.
    ///
    /// A 401 triggers one token refresh and one retry. Any other failure
    /// status, or a failed retry, is returned as `UploadError::Rejected`.
    #[instrument(skip(self, records), fields(url = %self.upload_url, records = records.len()))]
    pub async fn upload(&self, records: &[ForecastRecord]) -> Result<(), UploadError> {
        info!("Uploading {} records", records.len());

        // Export lives on disk only for the duration of this call
        let mut export_file = tempfile::Builder::new()
            .prefix("forecast")
            .suffix(".csv")
            .tempfile()?;
        write_export(records, export_file.as_file_mut())?;
        let export = tokio::fs::read(export_file.path()).await?;
        debug!("Wrote export ({} bytes) to {}", export.len(), export_file.path().display());

        let token = self.tokens.current().await.unwrap_or_default();
        let (mut status, mut body) = self.post_export(&export, &token).await?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("Access token rejected, refreshing and retrying upload");
            let token = self.tokens.refresh().await?;
            (status, body) = self.post_export(&export, &token).await?;
        }

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status,
                body: truncate(&body, 200).to_string(),
            });
        }

        info!("Uploaded {} records to Creator", records.len());
        Ok(())
    }

    async fn post_export(&self, export: &[u8], token: &str) -> Result<(StatusCode, String), UploadError> {
        let data = Part::bytes(export.to_vec())
            .file_name(EXPORT_FILE_NAME)
            .mime_str("text/csv")?;
        let form = Form::new()
            .text("Name", self.upload_name.clone())
            .part("Data", data);

        let response = self
            .client
            .post(&self.upload_url)
            .header(AUTHORIZATION, format!("Zoho-oauthtoken {token}"))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Upload response: {} {}", status, truncate(&body, 200));

        Ok((status, body))
    }
}

/// Write records as CSV, header row first, in the order given
pub fn write_export<W: Write>(records: &[ForecastRecord], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;

    Ok(())
}
