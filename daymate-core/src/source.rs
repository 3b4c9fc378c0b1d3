use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt::Debug;

use crate::{config::Config, error::FetchError, location::Location};

/// What the weather endpoint answered.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceResponse {
    /// 2xx with a JSON body.
    Body(Value),
    /// Any non-success status; the body is not inspected further.
    Status(StatusCode),
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self, location: &Location) -> Result<SourceResponse, FetchError>;
}

/// `GET {base}/api/weather/{location}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWeatherSource {
    base_url: String,
    http: Client,
}

impl HttpWeatherSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base_url())
    }

    pub fn endpoint(&self, location: &Location) -> String {
        format!("{}/api/weather/{}", self.base_url.trim_end_matches('/'), location.encoded())
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn fetch(&self, location: &Location) -> Result<SourceResponse, FetchError> {
        let url = self.endpoint(location);
        tracing::debug!(%url, "requesting weather");

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "weather endpoint returned an error");
            return Ok(SourceResponse::Status(status));
        }

        Ok(SourceResponse::Body(serde_json::from_str(&body)?))
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
