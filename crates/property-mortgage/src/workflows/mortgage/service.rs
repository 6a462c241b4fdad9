use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::calculator::{self, validate_application};
use super::domain::{AffordabilityResult, InvalidInputError, LoanApplication, RateSource};
use super::evaluation::{ApprovalEngine, ApprovalPolicy, ApprovalReport};
use crate::workflows::rates::{RateObservation, RateProvider, RateProviderError};

/// Number of weekly observations served by the historical rate endpoint.
pub const HISTORICAL_RATE_WINDOW: usize = 12;

/// Service composing the rate provider, affordability calculator, and approval engine.
pub struct MortgageAnalysisService<P> {
    rates: Arc<P>,
    engine: ApprovalEngine,
    fallback_rate: f64,
}

impl<P> MortgageAnalysisService<P>
where
    P: RateProvider + 'static,
{
    pub fn new(rates: Arc<P>, policy: ApprovalPolicy, fallback_rate: f64) -> Self {
        Self {
            rates,
            engine: ApprovalEngine::new(policy),
            fallback_rate,
        }
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        self.engine.policy()
    }

    /// Uses the requested rate when present, otherwise the market rate, otherwise the fallback.
    pub async fn resolve_rate(&self, requested: Option<f64>) -> (f64, RateSource) {
        if let Some(rate) = requested {
            return (rate, RateSource::Requested);
        }

        match self.rates.current_rate().await {
            Ok(observation) if observation.rate.is_finite() && observation.rate >= 0.0 => {
                (observation.rate, RateSource::Market)
            }
            Ok(observation) => {
                warn!(
                    rate = observation.rate,
                    fallback = self.fallback_rate,
                    "market rate out of range, using fallback"
                );
                (self.fallback_rate, RateSource::Fallback)
            }
            Err(err) => {
                warn!(error = %err, fallback = self.fallback_rate, "market rate unavailable, using fallback");
                (self.fallback_rate, RateSource::Fallback)
            }
        }
    }

    /// Run the affordability calculation and approval rules for one application.
    pub async fn analyze(
        &self,
        application: LoanApplication,
    ) -> Result<MortgageAnalysis, InvalidInputError> {
        validate_application(&application)?;

        let (rate, rate_source) = self.resolve_rate(application.financing_rate).await;
        let affordability = calculator::compute(
            application.loan_amount,
            application.home_value,
            application.down_payment,
            application.annual_income,
            application.total_debt,
            rate,
        )?;
        let report = self.engine.evaluate(
            application.credit_score,
            affordability.dti_ratio,
            affordability.ltv_ratio,
            affordability.down_payment_ratio,
        )?;

        info!(
            status = report.status.label(),
            ?rate_source,
            rate,
            "mortgage analysis completed"
        );

        Ok(MortgageAnalysis {
            rate,
            rate_source,
            affordability,
            report,
        })
    }

    pub async fn historical_rates(&self) -> Result<Vec<RateObservation>, RateProviderError> {
        self.rates.historical_rates(HISTORICAL_RATE_WINDOW).await
    }
}

/// Full-precision analysis outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct MortgageAnalysis {
    pub rate: f64,
    pub rate_source: RateSource,
    pub affordability: AffordabilityResult,
    pub report: ApprovalReport,
}

impl MortgageAnalysis {
    pub fn view(&self) -> MortgageAnalysisView {
        let rounded = self.affordability.rounded();
        MortgageAnalysisView {
            approval_status: self.report.status.label(),
            monthly_payment: rounded.monthly_payment,
            dti_ratio: rounded.dti_ratio,
            ltv_ratio: rounded.ltv_ratio,
            down_payment_ratio: rounded.down_payment_ratio,
            mortgage_rate: self.rate,
            rate_source: self.rate_source,
            approval_details: self.report.details(),
            approval_checks: self.report.checks(),
        }
    }
}

/// Response payload with values rounded to cents.
#[derive(Debug, Clone, Serialize)]
pub struct MortgageAnalysisView {
    pub approval_status: &'static str,
    pub monthly_payment: f64,
    #[serde(rename = "DTI_ratio")]
    pub dti_ratio: f64,
    #[serde(rename = "LTV_ratio")]
    pub ltv_ratio: f64,
    pub down_payment_ratio: f64,
    pub mortgage_rate: f64,
    pub rate_source: RateSource,
    pub approval_details: BTreeMap<&'static str, &'static str>,
    pub approval_checks: BTreeMap<&'static str, bool>,
}
