use super::{RateObservation, RateProvider, RateProviderError};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

/// Freddie Mac 30-year fixed rate mortgage average.
pub const MORTGAGE_SERIES_ID: &str = "MORTGAGE30US";

const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Client for the St. Louis Fed series observation endpoint.
#[derive(Clone)]
pub struct FredRateClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for FredRateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FredRateClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FredRateClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self::with_base_url(http, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        http: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, limit: usize) -> Result<Vec<RateObservation>, RateProviderError> {
        let limit = limit.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("series_id", MORTGAGE_SERIES_ID),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateProviderError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let observations = parse_observations(&body)?;
        debug!(count = observations.len(), "fetched mortgage rate observations");
        Ok(observations)
    }
}

#[async_trait]
impl RateProvider for FredRateClient {
    async fn current_rate(&self) -> Result<RateObservation, RateProviderError> {
        self.fetch(1)
            .await?
            .into_iter()
            .next()
            .ok_or(RateProviderError::Empty)
    }

    async fn historical_rates(
        &self,
        limit: usize,
    ) -> Result<Vec<RateObservation>, RateProviderError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.fetch(limit).await
    }
}

#[derive(Deserialize)]
struct ObservationsPayload {
    observations: Vec<RawObservation>,
}

#[derive(Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

/// Parses a series observation payload. Entries carrying FRED's `"."` missing-value marker are
/// skipped; any other unparseable entry rejects the payload.
pub fn parse_observations(body: &str) -> Result<Vec<RateObservation>, RateProviderError> {
    let payload: ObservationsPayload = serde_json::from_str(body)
        .map_err(|err| RateProviderError::Malformed(err.to_string()))?;

    let mut observations = Vec::with_capacity(payload.observations.len());
    for raw in payload.observations {
        if raw.value.trim() == "." {
            continue;
        }
        let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|err| {
            RateProviderError::Malformed(format!("bad observation date '{}': {err}", raw.date))
        })?;
        let rate = raw.value.trim().parse::<f64>().map_err(|err| {
            RateProviderError::Malformed(format!("bad observation value '{}': {err}", raw.value))
        })?;
        observations.push(RateObservation { date, rate });
    }

    Ok(observations)
}
