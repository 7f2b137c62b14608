//! Client for the current conditions API.

use std::sync::Arc;

use supp_core::{Error, Result};
use url::Url;

use crate::config::CONDITIONS_BLOCKS;
use crate::transport::{fetch_with_retry, obfuscate_key, FetchRetry, Transport};

pub const CONDITIONS_BASE_URL: &str = "https://api.darksky.net/forecast";

pub struct ConditionsApi {
    key: String,
    latitude: f64,
    longitude: f64,
    base_url: Url,
    transport: Arc<dyn Transport>,
    retry: FetchRetry,
}

impl ConditionsApi {
    pub fn new(
        key: String,
        latitude: f64,
        longitude: f64,
        transport: Arc<dyn Transport>,
        retry: FetchRetry,
    ) -> Result<Self> {
        let base_url = Url::parse(CONDITIONS_BASE_URL)
            .map_err(|e| Error::config(format!("conditions base URL: {}", e)))?;
        Ok(Self {
            key,
            latitude,
            longitude,
            base_url,
            transport,
            retry,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn obfuscated_key(&self) -> String {
        obfuscate_key(&self.key)
    }

    /// Every block except `block` is excluded; `currently` is always kept.
    fn build_url(&self, block: &str, language: &str, units: &str, key: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("conditions base URL cannot take a path"))?
            .push(key)
            .push(&format!("{},{}", self.latitude, self.longitude));

        let exclude: Vec<&str> = CONDITIONS_BLOCKS
            .iter()
            .copied()
            .filter(|b| *b != block)
            .collect();
        url.query_pairs_mut()
            .append_pair("exclude", &exclude.join(","))
            .append_pair("lang", language)
            .append_pair("units", units);
        Ok(url)
    }

    pub fn data_url(&self, block: &str, language: &str, units: &str) -> Result<Url> {
        self.build_url(block, language, units, &self.key)
    }

    pub fn display_url(&self, block: &str, language: &str, units: &str) -> Result<String> {
        Ok(self
            .build_url(block, language, units, &self.obfuscated_key())?
            .to_string())
    }

    pub async fn data(&self, block: &str, language: &str, units: &str) -> Option<String> {
        let url = self.data_url(block, language, units);
        let display = self.display_url(block, language, units);
        let (url, display) = match (url, display) {
            (Ok(url), Ok(display)) => (url, display),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Cannot build conditions URL");
                return None;
            }
        };
        fetch_with_retry(self.transport.as_ref(), &url, &display, self.retry, "conditions").await
    }
}
