mod config;
mod policy;
mod rules;

pub use config::ApprovalPolicy;
pub use policy::{ApprovalReport, ApprovalStatus};
pub use rules::{ApprovalRule, RuleVerdict};

use super::domain::InvalidInputError;
use policy::decide_status;
use rules::{check_rules, ApprovalSignals};

/// Lowest and highest scores on the conventional credit scale.
pub const CREDIT_SCORE_RANGE: std::ops::RangeInclusive<i32> = 300..=850;

/// Stateless evaluator applying an [`ApprovalPolicy`] to calculator output.
#[derive(Debug, Clone, Default)]
pub struct ApprovalEngine {
    policy: ApprovalPolicy,
}

impl ApprovalEngine {
    pub fn new(policy: ApprovalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }

    pub fn evaluate(
        &self,
        credit_score: i32,
        dti_ratio: f64,
        ltv_ratio: f64,
        down_payment_ratio: f64,
    ) -> Result<ApprovalReport, InvalidInputError> {
        validate_credit_score(credit_score)?;
        for (field, value) in [
            ("dti_ratio", dti_ratio),
            ("ltv_ratio", ltv_ratio),
            ("down_payment_ratio", down_payment_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidInputError::new(
                    field,
                    "must be a finite, non-negative percentage",
                ));
            }
        }

        let signals = ApprovalSignals {
            credit_score,
            dti_ratio,
            ltv_ratio,
            down_payment_ratio,
        };
        let verdicts = check_rules(&signals, &self.policy);
        let status = decide_status(&verdicts);

        Ok(ApprovalReport { status, verdicts })
    }
}

pub(crate) fn validate_credit_score(credit_score: i32) -> Result<(), InvalidInputError> {
    if CREDIT_SCORE_RANGE.contains(&credit_score) {
        return Ok(());
    }
    Err(InvalidInputError::new(
        "credit_score",
        format!(
            "must be between {} and {} (got {credit_score})",
            CREDIT_SCORE_RANGE.start(),
            CREDIT_SCORE_RANGE.end()
        ),
    ))
}
