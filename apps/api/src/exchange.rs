//! # Exchange Rates
//!
//! ARS → USD lookups for costing applications.
//!
//! ## Failure Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HttpRateProvider::usd_per_ars()                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET {url} ──► 2xx + {"rates": {"USD": 0.00085}} ──► ExchangeRate       │
//! │       │                                                                 │
//! │       └── timeout / connect error / non-2xx / bad JSON /                │
//! │           missing USD / zero, negative or non-finite value              │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           warn!(...) ──► configured fallback rate                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup failure never fails an application. No retries, no caching.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, ConfigResult, ExchangeSettings};
use ruralis_core::ExchangeRate;

/// Why a lookup didn't produce a usable rate.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Transport failure, timeout, or undecodable body.
    #[error("Exchange request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Exchange service returned {0}")]
    Status(StatusCode),

    /// Body had no `rates.USD`.
    #[error("Exchange response has no USD rate")]
    MissingRate,

    /// `rates.USD` was zero, negative or not finite.
    #[error("Exchange service returned an unusable rate: {0}")]
    InvalidRate(f64),
}

/// Source of the current ARS → USD rate.
///
/// Infallible by contract: implementations absorb their own failures.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// USD per ARS, right now.
    async fn usd_per_ars(&self) -> ExchangeRate;
}

// =============================================================================
// HTTP Provider
// =============================================================================

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Rate provider backed by an exchangerate-api style endpoint.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: Client,
    url: String,
    fallback: ExchangeRate,
}

impl HttpRateProvider {
    /// Creates a provider with an explicit request timeout.
    pub fn new(
        url: impl Into<String>,
        fallback: ExchangeRate,
        timeout: Duration,
    ) -> Result<Self, ExchangeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpRateProvider {
            client,
            url: url.into(),
            fallback,
        })
    }

    /// Creates a provider from the `[exchange]` config section.
    pub fn from_settings(settings: &ExchangeSettings) -> ConfigResult<Self> {
        let fallback = settings.fallback()?;
        Self::new(settings.url.clone(), fallback, settings.timeout())
            .map_err(|e| ConfigError::Invalid(format!("exchange client: {e}")))
    }

    /// The rate returned when a lookup fails.
    pub fn fallback(&self) -> ExchangeRate {
        self.fallback
    }

    /// Performs one lookup, surfacing every failure.
    pub async fn fetch(&self) -> Result<ExchangeRate, ExchangeError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Status(status));
        }

        let body: LatestRates = response.json().await?;
        let usd = *body.rates.get("USD").ok_or(ExchangeError::MissingRate)?;

        ExchangeRate::new(usd).ok_or(ExchangeError::InvalidRate(usd))
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn usd_per_ars(&self) -> ExchangeRate {
        match self.fetch().await {
            Ok(rate) => {
                debug!(%rate, "Fetched exchange rate");
                rate
            }
            Err(e) => {
                warn!(
                    error = %e,
                    url = %self.url,
                    fallback = self.fallback.usd_per_ars(),
                    "Exchange rate lookup failed, using fallback"
                );
                self.fallback
            }
        }
    }
}

// =============================================================================
// Fixed Provider
// =============================================================================

/// Always returns the same rate. Used offline and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub ExchangeRate);

#[async_trait]
impl RateProvider for FixedRate {
    async fn usd_per_ars(&self) -> ExchangeRate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const FALLBACK: f64 = 0.001;

    fn provider(url: String) -> HttpRateProvider {
        HttpRateProvider::new(
            url,
            ExchangeRate::new(FALLBACK).unwrap(),
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetches_usd_rate() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/v4/latest/ARS");
                then.status(200)
                    .json_body(json!({"base": "ARS", "rates": {"USD": 0.00085, "EUR": 0.00078}}));
            })
            .await;

        let rate = provider(server.url("/v4/latest/ARS")).usd_per_ars().await;

        mock.assert_async().await;
        assert_eq!(rate.usd_per_ars(), 0.00085);
    }

    #[tokio::test]
    async fn test_server_error_uses_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(503);
            })
            .await;

        let p = provider(server.url("/"));
        assert!(matches!(p.fetch().await, Err(ExchangeError::Status(_))));
        assert_eq!(p.usd_per_ars().await.usd_per_ars(), FALLBACK);
    }

    #[tokio::test]
    async fn test_missing_or_bad_rate_uses_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/no-usd");
                then.status(200).json_body(json!({"rates": {"EUR": 0.0008}}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.path("/negative");
                then.status(200).json_body(json!({"rates": {"USD": -1.0}}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.path("/garbage");
                then.status(200).body("<html>rate limited</html>");
            })
            .await;

        let no_usd = provider(server.url("/no-usd"));
        assert!(matches!(no_usd.fetch().await, Err(ExchangeError::MissingRate)));
        assert_eq!(no_usd.usd_per_ars().await.usd_per_ars(), FALLBACK);

        let negative = provider(server.url("/negative"));
        assert!(matches!(negative.fetch().await, Err(ExchangeError::InvalidRate(_))));
        assert_eq!(negative.usd_per_ars().await.usd_per_ars(), FALLBACK);

        let garbage = provider(server.url("/garbage"));
        assert!(matches!(garbage.fetch().await, Err(ExchangeError::Request(_))));
        assert_eq!(garbage.usd_per_ars().await.usd_per_ars(), FALLBACK);
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .json_body(json!({"rates": {"USD": 0.5}}));
            })
            .await;

        let rate = provider(server.url("/")).usd_per_ars().await;
        assert_eq!(rate.usd_per_ars(), FALLBACK);
    }

    #[tokio::test]
    async fn test_unreachable_host_uses_fallback() {
        let rate = provider("http://127.0.0.1:9/latest".to_string())
            .usd_per_ars()
            .await;
        assert_eq!(rate.usd_per_ars(), FALLBACK);
    }

    #[tokio::test]
    async fn test_fixed_rate() {
        let fixed = FixedRate(ExchangeRate::new(0.002).unwrap());
        assert_eq!(fixed.usd_per_ars().await.usd_per_ars(), 0.002);
    }
}
