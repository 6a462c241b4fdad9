use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::mortgage::{
    mortgage_router, ApprovalPolicy, LoanApplication, MortgageAnalysisService,
};
use crate::workflows::rates::{RateObservation, RateProvider, RateProviderError};

pub(super) const FALLBACK_RATE: f64 = 3.5;

/// 500k home, 400k loan, 100k down, 120k income, 15k monthly debt, 720 credit.
pub(super) fn high_debt_application() -> LoanApplication {
    LoanApplication {
        home_value: 500_000.0,
        loan_amount: 400_000.0,
        down_payment: 100_000.0,
        annual_income: 120_000.0,
        total_debt: 15_000.0,
        credit_score: 720,
        financing_rate: Some(3.5),
    }
}

pub(super) fn qualified_application() -> LoanApplication {
    LoanApplication {
        total_debt: 3_000.0,
        ..high_debt_application()
    }
}

pub(super) fn observation(rate: f64) -> RateObservation {
    RateObservation {
        date: NaiveDate::from_ymd_opt(2024, 10, 10).expect("valid date"),
        rate,
    }
}

/// Market data stub that counts lookups.
pub(super) struct StaticRates {
    pub(super) rate: f64,
    calls: AtomicUsize,
}

impl StaticRates {
    pub(super) fn new(rate: f64) -> Self {
        Self {
            rate,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for StaticRates {
    async fn current_rate(&self) -> Result<RateObservation, RateProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(observation(self.rate))
    }

    async fn historical_rates(
        &self,
        limit: usize,
    ) -> Result<Vec<RateObservation>, RateProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..limit)
            .map(|offset| observation(self.rate + offset as f64 * 0.1))
            .collect())
    }
}

pub(super) struct OfflineRates;

#[async_trait]
impl RateProvider for OfflineRates {
    async fn current_rate(&self) -> Result<RateObservation, RateProviderError> {
        Err(RateProviderError::Status(503))
    }

    async fn historical_rates(
        &self,
        _limit: usize,
    ) -> Result<Vec<RateObservation>, RateProviderError> {
        Err(RateProviderError::Status(503))
    }
}

pub(super) fn service_with<P: RateProvider + 'static>(
    rates: Arc<P>,
) -> MortgageAnalysisService<P> {
    MortgageAnalysisService::new(rates, ApprovalPolicy::default(), FALLBACK_RATE)
}

pub(super) fn router_with<P: RateProvider + 'static>(rates: Arc<P>) -> axum::Router {
    mortgage_router(Arc::new(service_with(rates)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
