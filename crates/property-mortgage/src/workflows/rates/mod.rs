//! Mortgage rate lookups backing the affordability analysis.

mod fred;

pub use fred::{parse_observations, FredRateClient, MORTGAGE_SERIES_ID};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One weekly average 30-year fixed rate, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum RateProviderError {
    #[error("rate provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rate provider returned status {0}")]
    Status(u16),
    #[error("rate provider returned malformed data: {0}")]
    Malformed(String),
    #[error("rate provider returned no observations")]
    Empty,
}

/// Source of current and historical financing rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn current_rate(&self) -> Result<RateObservation, RateProviderError>;
    async fn historical_rates(&self, limit: usize)
        -> Result<Vec<RateObservation>, RateProviderError>;
}

/// Constant rate, used when no market data source is configured.
#[derive(Debug, Clone)]
pub struct FixedRateProvider {
    observation: RateObservation,
}

impl FixedRateProvider {
    pub fn new(rate: f64, as_of: NaiveDate) -> Self {
        Self {
            observation: RateObservation { date: as_of, rate },
        }
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    async fn current_rate(&self) -> Result<RateObservation, RateProviderError> {
        Ok(self.observation.clone())
    }

    async fn historical_rates(
        &self,
        limit: usize,
    ) -> Result<Vec<RateObservation>, RateProviderError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![self.observation.clone()])
    }
}

/// Provider chosen at startup from the available credentials.
#[derive(Debug, Clone)]
pub enum ConfiguredRateProvider {
    Fred(FredRateClient),
    Fixed(FixedRateProvider),
}

#[async_trait]
impl RateProvider for ConfiguredRateProvider {
    async fn current_rate(&self) -> Result<RateObservation, RateProviderError> {
        match self {
            ConfiguredRateProvider::Fred(client) => client.current_rate().await,
            ConfiguredRateProvider::Fixed(provider) => provider.current_rate().await,
        }
    }

    async fn historical_rates(
        &self,
        limit: usize,
    ) -> Result<Vec<RateObservation>, RateProviderError> {
        match self {
            ConfiguredRateProvider::Fred(client) => client.historical_rates(limit).await,
            ConfiguredRateProvider::Fixed(provider) => provider.historical_rates(limit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_provider_reports_its_rate() {
        let as_of = NaiveDate::from_ymd_opt(2024, 10, 10).expect("valid date");
        let provider = ConfiguredRateProvider::Fixed(FixedRateProvider::new(6.5, as_of));

        let current = provider.current_rate().await.expect("fixed rate");
        assert_eq!(current.rate, 6.5);
        assert_eq!(current.date, as_of);

        let history = provider.historical_rates(12).await.expect("history");
        assert_eq!(history.len(), 1);
        assert!(provider.historical_rates(0).await.expect("empty").is_empty());
    }
}
