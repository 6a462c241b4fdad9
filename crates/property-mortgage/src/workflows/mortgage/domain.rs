use serde::{Deserialize, Serialize};

/// Borrower and property figures submitted for an affordability check.
///
/// `total_debt` is the borrower's monthly debt obligation; it is compared against monthly
/// income when deriving the debt-to-income ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub home_value: f64,
    pub loan_amount: f64,
    pub down_payment: f64,
    pub annual_income: f64,
    pub total_debt: f64,
    pub credit_score: i32,
    /// Annual percentage rate. When absent the current market rate is looked up.
    #[serde(default)]
    pub financing_rate: Option<f64>,
}

/// Ratios and payment derived from a [`LoanApplication`]. Values keep full precision; use
/// [`AffordabilityResult::rounded`] at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub monthly_payment: f64,
    pub dti_ratio: f64,
    pub ltv_ratio: f64,
    pub down_payment_ratio: f64,
}

impl AffordabilityResult {
    pub fn rounded(&self) -> Self {
        Self {
            monthly_payment: round_cents(self.monthly_payment),
            dti_ratio: round_cents(self.dti_ratio),
            ltv_ratio: round_cents(self.ltv_ratio),
            down_payment_ratio: round_cents(self.down_payment_ratio),
        }
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Where the financing rate used for an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Requested,
    Market,
    Fallback,
}

/// Rejected numeric input. Surfaces as a client error and is never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidInputError {
    pub field: &'static str,
    pub reason: String,
}

impl InvalidInputError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
