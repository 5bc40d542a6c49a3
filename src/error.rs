use std::num::ParseIntError;

use thiserror::Error;

/// Everything that can abort a collection cycle.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    FetchStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("label '{label}' not found in page")]
    LabelNotFound { label: String },

    #[error("label '{label}' is not followed by a text value")]
    ValueShapeUnexpected { label: String },

    #[error("malformed duration '{input}': {reason}")]
    MalformedDuration { input: String, reason: String },

    #[error("value '{value}' for '{label}' is not an integer")]
    ValueConversion {
        label: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl ScrapeError {
    /// True for network, timeout and HTTP status failures.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::FetchStatus { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Fetch { source, .. } if source.is_timeout())
    }
}
