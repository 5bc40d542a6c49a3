use anyhow::{Context, Result};
use std::time::Duration;

use crate::error::ScrapeError;

/// HTTP client bound to one gateway.
#[derive(Debug, Clone)]
pub struct RouterClient {
    base_url: String,
    http: reqwest::Client,
}

impl RouterClient {
    pub fn new(router_addr: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bgw-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: normalize_base(router_addr),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` from the gateway and returns the body as text.
    pub async fn fetch(&self, path: &str) -> Result<String, ScrapeError> {
        let url = format!("{}{}", self.base_url, path);
        let fetch_error = |source| ScrapeError::Fetch {
            url: url.clone(),
            source,
        };

        let response = self.http.get(&url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::FetchStatus {
                url: url.clone(),
                status,
            });
        }
        let body = response.text().await.map_err(fetch_error)?;
        tracing::debug!(url = %url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}

fn normalize_base(router_addr: &str) -> String {
    let trimmed = router_addr.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
