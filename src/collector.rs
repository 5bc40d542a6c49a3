use anyhow::Result;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::error::ScrapeError;
use crate::fetch::RouterClient;
use crate::metrics::{self, MetricSample};
use crate::parser::{BroadbandStatus, DeviceInfo, BROADBAND_PATH, SYSINFO_PATH};

/// Everything read from the gateway during one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub device: DeviceInfo,
    pub broadband: BroadbandStatus,
}

impl Snapshot {
    pub fn samples(&self) -> Vec<MetricSample> {
        metrics::assemble(&self.device, &self.broadband)
    }
}

/// Runs collection cycles against a single gateway. Holds no state between cycles.
pub struct Collector {
    client: RouterClient,
}

impl Collector {
    pub fn new(client: RouterClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = RouterClient::new(
            &config.router_addr,
            Duration::from_secs(config.fetch_timeout_seconds),
        )?;
        Ok(Self::new(client))
    }

    pub fn router_url(&self) -> &str {
        self.client.base_url()
    }

    /// Fetches both status pages and extracts them. Any failure aborts the whole cycle.
    pub async fn collect(&self) -> Result<Snapshot, ScrapeError> {
        let started = Instant::now();

        // Each page is parsed before the next await; parsed documents are not Send.
        let markup = self.client.fetch(SYSINFO_PATH).await?;
        let device = DeviceInfo::from_markup(&markup)?;

        let markup = self.client.fetch(BROADBAND_PATH).await?;
        let broadband = BroadbandStatus::from_markup(&markup)?;

        tracing::debug!(
            router = %self.client.base_url(),
            model = %device.model_number,
            connection = ?broadband.connection_state,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection cycle completed"
        );
        Ok(Snapshot { device, broadband })
    }

    /// Runs one cycle and renders it, or reports why nothing can be published.
    pub async fn scrape(&self) -> Result<String> {
        let snapshot = self.collect().await.inspect_err(|err| {
            tracing::warn!(
                router = %self.client.base_url(),
                error = %err,
                timeout = err.is_timeout(),
                "collection cycle failed"
            );
        })?;
        metrics::render(&snapshot.samples())
    }
}
