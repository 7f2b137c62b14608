//! Client for the daily forecast API.

use std::sync::Arc;

use supp_core::{Error, Result};
use url::Url;

use crate::transport::{fetch_with_retry, obfuscate_key, FetchRetry, Transport};

pub const FORECAST_BASE_URL: &str = "https://api.weather.com/v3/wx/forecast/daily";

/// Query selectors for one forecast request, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    /// `3day` .. `15day`.
    pub forecast: String,
    pub locator: String,
    pub location: String,
    pub units: String,
    pub language: String,
}

pub struct ForecastApi {
    api_key: String,
    base_url: Url,
    transport: Arc<dyn Transport>,
    retry: FetchRetry,
}

impl ForecastApi {
    pub fn new(api_key: String, transport: Arc<dyn Transport>, retry: FetchRetry) -> Result<Self> {
        let base_url = Url::parse(FORECAST_BASE_URL)
            .map_err(|e| Error::config(format!("forecast base URL: {}", e)))?;
        Ok(Self {
            api_key,
            base_url,
            transport,
            retry,
        })
    }

    /// Points the client at a different host, e.g. a local test server.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn obfuscated_key(&self) -> String {
        obfuscate_key(&self.api_key)
    }

    /// Builds the request URL carrying `key`.
    fn build_url(&self, request: &ForecastRequest, key: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("forecast base URL cannot take a path"))?
            .push(&request.forecast);
        url.query_pairs_mut()
            .append_pair(&request.locator, &request.location)
            .append_pair("units", &request.units)
            .append_pair("language", &request.language)
            .append_pair("format", "json")
            .append_pair("apiKey", key);
        Ok(url)
    }

    pub fn forecast_url(&self, request: &ForecastRequest) -> Result<Url> {
        self.build_url(request, &self.api_key)
    }

    /// The request URL with the key obfuscated, safe to log.
    pub fn display_url(&self, request: &ForecastRequest) -> Result<String> {
        Ok(self.build_url(request, &self.obfuscated_key())?.to_string())
    }

    /// Requests the forecast. `None` once the attempt budget is spent.
    pub async fn forecast(&self, request: &ForecastRequest) -> Option<String> {
        let (url, display) = match (self.forecast_url(request), self.display_url(request)) {
            (Ok(url), Ok(display)) => (url, display),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Cannot build forecast URL");
                return None;
            }
        };
        fetch_with_retry(self.transport.as_ref(), &url, &display, self.retry, "forecast").await
    }
}
