//! External flight data sources.
//!
//! Every source is adapted behind [`FlightProvider`] and reports a [`Lookup`]:
//! a match, an ordinary miss, or a failure. Misses are not errors.

pub mod aviationstack;
pub mod opensky;

use crate::types::FlightRecord;
use crate::variants::FlightCode;
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use aviationstack::AviationStackProvider;
pub use opensky::OpenSkyProvider;

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("resolution deadline exceeded")]
    DeadlineExceeded,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("provider returned error {code}: {message}")]
    Api { code: String, message: String },
}

/// Result of asking one provider about one flight.
#[derive(Debug)]
pub enum Lookup {
    Found(FlightRecord),
    NotFound,
    Failed(ProviderError),
}

impl Lookup {
    /// Metric tag for the outcome.
    pub const fn outcome(&self) -> &'static str {
        match self {
            Lookup::Found(_) => "found",
            Lookup::NotFound => "not_found",
            Lookup::Failed(_) => "error",
        }
    }
}

#[async_trait]
pub trait FlightProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Looks up a flight. Implementations own their retry-over-variants
    /// strategy and must not return `Failed` for an ordinary miss.
    async fn resolve(&self, code: &FlightCode) -> Lookup;
}

/// Sends a GET request and decodes a JSON body. The timeout covers the whole
/// exchange, including reading the body.
pub(crate) async fn get_json<T>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    let exchange = async {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ProviderError::Timeout(timeout))?
}
