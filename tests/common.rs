#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use bgw_exporter::{fetch::RouterClient, service, Collector};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;

pub const SYSINFO: &str = include_str!("fixtures/sysinfo.html");
const BROADBAND_TEMPLATE: &str = include_str!("fixtures/broadbandstatistics.html");

pub fn broadband_page(connection: &str) -> String {
    BROADBAND_TEMPLATE.replace("{{CONNECTION}}", connection)
}

/// How the fake gateway answers the broadband statistics request.
#[derive(Clone)]
pub enum Broadband {
    Page(String),
    Slow(Duration),
    Missing,
}

/// Serves the two status pages on an ephemeral port and returns its address.
pub async fn spawn_gateway(broadband: Broadband) -> SocketAddr {
    let app = Router::new()
        .route("/cgi-bin/sysinfo.ha", get(|| async { Html(SYSINFO) }))
        .route(
            "/cgi-bin/broadbandstatistics.ha",
            get(move || {
                let broadband = broadband.clone();
                async move { answer(broadband).await }
            }),
        );
    spawn(app).await
}

async fn answer(broadband: Broadband) -> Response {
    match broadband {
        Broadband::Page(markup) => Html(markup).into_response(),
        Broadband::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Html(broadband_page("Up")).into_response()
        }
        Broadband::Missing => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn collector(gateway: SocketAddr, timeout: Duration) -> Collector {
    let client = RouterClient::new(&gateway.to_string(), timeout).expect("build client");
    Collector::new(client)
}

/// Runs the exporter's HTTP surface in front of `collector`.
pub async fn spawn_exporter(collector: Collector) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind exporter");
    let addr = listener.local_addr().expect("exporter addr");
    tokio::spawn(service::serve(
        listener,
        Arc::new(collector),
        std::future::pending(),
    ));
    addr
}

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind gateway");
    let addr = listener.local_addr().expect("gateway addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake gateway");
    });
    addr
}
