pub mod collector;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod platform;
pub mod service;

pub use collector::Collector;
pub use config::AppConfig;
pub use error::ScrapeError;
pub use service::Service;
