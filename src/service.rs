use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::{future::Future, sync::Arc};
use tokio::{net::TcpListener, signal};

use crate::collector::Collector;
use crate::config::AppConfig;

const INDEX: &str = r#"<html>
<head><title>BGW320 Exporter</title></head>
<body>
<h1>BGW320 Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

pub struct Service {
    config: AppConfig,
    collector: Arc<Collector>,
}

impl Service {
    pub fn new(config: AppConfig, collector: Arc<Collector>) -> Self {
        Self { config, collector }
    }

    pub async fn run(self) -> Result<()> {
        let service_name = self.config.service_name.clone();
        self.run_until(async move {
            signal::ctrl_c().await.ok();
            tracing::info!(service = %service_name, "ctrl-c received, shutting down");
        })
        .await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let AppConfig {
            service_name,
            listen_addr,
            port,
            ..
        } = &self.config;

        let listener = TcpListener::bind((listen_addr.as_str(), *port))
            .await
            .with_context(|| format!("failed to bind {listen_addr}:{port}"))?;
        let local_addr = listener.local_addr().context("read bound address")?;

        tracing::info!(
            service = %service_name,
            listen = %local_addr,
            router = %self.collector.router_url(),
            "exporter listening"
        );

        serve(listener, self.collector, shutdown).await
    }
}

/// Routes: `/metrics` runs one collection cycle per request, `/` links to it.
pub fn router(collector: Arc<Collector>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics))
        .with_state(collector)
}

pub async fn serve<F>(listener: TcpListener, collector: Arc<Collector>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(collector))
        .with_graceful_shutdown(shutdown)
        .await
        .context("metrics server failed")
}

async fn index() -> Html<&'static str> {
    Html(INDEX)
}

async fn metrics(State(collector): State<Arc<Collector>>) -> Response {
    match collector.scrape().await {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!("scrape failed: {err:#}\n"),
        )
            .into_response(),
    }
}
