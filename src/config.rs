use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_router_addr")]
    pub router_addr: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_seconds: u64,
}

fn default_service_name() -> String {
    "bgw-exporter".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_router_addr() -> String {
    "dsldevice.attlocal.net".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_fetch_timeout_secs() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            router_addr: default_router_addr(),
            listen_addr: default_listen_addr(),
            port: default_port(),
            fetch_timeout_seconds: default_fetch_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> &'static str {
        "config/bgw-exporter.toml"
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("failed to read configuration from {}", path_ref.display()))?;
        let mut config: Self = toml::from_str(&raw).with_context(|| {
            format!("failed to parse configuration from {}", path_ref.display())
        })?;
        if config.service_name.trim().is_empty() {
            config.service_name = default_service_name();
        }
        if config.fetch_timeout_seconds == 0 {
            bail!("fetch_timeout_seconds must be at least 1");
        }
        Ok(config)
    }

    /// Loads `path` when given, otherwise the default path if it exists, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(Self::default_path()).exists() => Self::load(Self::default_path()),
            None => Ok(Self::default()),
        }
    }

    /// Applies `ROUTER_ADDR`, `ADDR` and `PORT`. An empty `PORT` keeps the configured port.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("ROUTER_ADDR").filter(|v| !v.trim().is_empty()) {
            self.router_addr = addr;
        }
        if let Some(addr) = lookup("ADDR").filter(|v| !v.trim().is_empty()) {
            self.listen_addr = addr;
        }
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT '{port}' is not a valid port number"))?;
        }
        Ok(())
    }
}
