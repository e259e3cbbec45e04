#![allow(dead_code)]

use forecast_sync::token_manager::{OAuthClient, TokenManager};
use forecast_sync::uploader::{CreatorForm, Uploader};
use mockito::{Matcher, Mock, ServerGuard};

pub const LOCATION_CODE: &str = "1-196832_1_al";
pub const TOKEN_PATH: &str = "/oauth/v2/token";
pub const UPLOAD_PATH: &str = "/api/v2/owner/weather/form/Forecast";
pub const EXPORT_HEADER_LINE: &str = "Date,HighTemp,LowTemp,PrecipChance_%,PrecipAmount_mm";

pub fn oauth_client() -> OAuthClient {
    OAuthClient {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        refresh_token: "refresh-token".to_string(),
    }
}

pub fn creator_form() -> CreatorForm {
    CreatorForm {
        owner: "owner".to_string(),
        app: "weather".to_string(),
        form: "Forecast".to_string(),
    }
}

/// Token manager and uploader both pointed at the same mock server
pub fn token_manager_and_uploader(server: &ServerGuard) -> (TokenManager, Uploader) {
    let tokens = TokenManager::new(&server.url(), oauth_client());
    let uploader = Uploader::new(&server.url(), &creator_form(), "Rayanadu".to_string(), tokens.clone());
    (tokens, uploader)
}

/// Token endpoint answering with `access_token`
pub async fn mock_token(server: &mut ServerGuard, access_token: &str, hits: usize) -> Mock {
    server
        .mock("POST", TOKEN_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("refresh_token".into(), "refresh-token".into()),
            Matcher::UrlEncoded("client_id".into(), "client-id".into()),
            Matcher::UrlEncoded("client_secret".into(), "client-secret".into()),
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json;charset=UTF-8")
        .with_body(format!(
            r#"{{"access_token":"{access_token}","api_domain":"https://www.zohoapis.in","token_type":"Bearer","expires_in":3600}}"#
        ))
        .expect(hits)
        .create_async()
        .await
}

/// Seed the token manager with `access_token` through one refresh, then drop the mock
pub async fn seed_token(server: &mut ServerGuard, tokens: &TokenManager, access_token: &str) {
    let mock = mock_token(server, access_token, 1).await;
    tokens.refresh().await.expect("Failed to seed access token");
    mock.remove_async().await;
}

/// Upload endpoint expecting `Zoho-oauthtoken <token>`
pub async fn mock_upload(server: &mut ServerGuard, token: &str, status: usize, hits: usize) -> Mock {
    server
        .mock("POST", UPLOAD_PATH)
        .match_header("authorization", format!("Zoho-oauthtoken {token}").as_str())
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":3000,"message":"Data Added Successfully!"}"#)
        .expect(hits)
        .create_async()
        .await
}

/// Daily forecast page shaped like the real site
pub fn forecast_page(date: Option<&str>, high: &str, low: &str, chance: &str, amount: &str) -> String {
    let date_block = date
        .map(|d| {
            format!(
                r#"<div class="subnav-pagination">
                    <div>{d}</div>
                    <a class="pagination-next" href="?day=2"></a>
                </div>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en-us">
<head><title>Daily Weather Forecast</title></head>
<body>
    {date_block}
    <div class="page-column-1">
        <div class="half-day-card">
            <div class="half-day-card-header">
                <h2 class="title">Day</h2>
                <div class="temperature">
                    {high}°
                </div>
            </div>
            <div class="half-day-card-content">
                <div class="panels">
                    <div class="left">
                        <p class="panel-item">Max UV Index<span class="value">8 (Very High)</span></p>
                        <p class="panel-item">Probability of Precipitation<span class="value">{chance}%</span></p>
                        <p class="panel-item">Probability of Thunderstorms<span class="value">9%</span></p>
                    </div>
                    <div class="right">
                        <p class="panel-item">Precipitation<span class="value">{amount} mm</span></p>
                        <p class="panel-item">Hours of Precipitation<span class="value">1</span></p>
                    </div>
                </div>
            </div>
        </div>
        <div class="half-day-card">
            <div class="half-day-card-header">
                <h2 class="title">Night</h2>
                <div class="temperature">
                    {low}°
                </div>
            </div>
            <div class="half-day-card-content">
                <div class="panels">
                    <p class="panel-item">Probability of Precipitation<span class="value">55%</span></p>
                    <p class="panel-item">Precipitation<span class="value">3.1 mm</span></p>
                </div>
            </div>
        </div>
    </div>
</body>
</html>"#
    )
}

/// Path of the daily forecast page for `LOCATION_CODE`
pub fn forecast_path() -> String {
    format!("/{LOCATION_CODE}/daily-weather-forecast/{LOCATION_CODE}")
}
