use super::config::ApprovalPolicy;
use serde::{Deserialize, Serialize};

/// Underwriting checks applied to every analysis, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRule {
    CreditScore,
    DebtToIncome,
    LoanToValue,
    DownPayment,
}

impl ApprovalRule {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::CreditScore,
            Self::DebtToIncome,
            Self::LoanToValue,
            Self::DownPayment,
        ]
    }

    /// Machine-readable verdict key.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreditScore => "credit_score_ok",
            Self::DebtToIncome => "dti_ok",
            Self::LoanToValue => "ltv_ok",
            Self::DownPayment => "down_payment_ok",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CreditScore => "Credit Score",
            Self::DebtToIncome => "DTI Ratio",
            Self::LoanToValue => "LTV Ratio",
            Self::DownPayment => "Down Payment",
        }
    }

    pub const fn indicator(self, passed: bool) -> &'static str {
        match (self, passed) {
            (Self::CreditScore, true) | (Self::DownPayment, true) => "✅ Sufficient",
            (Self::CreditScore, false) | (Self::DownPayment, false) => "❌ Insufficient",
            (Self::DebtToIncome, true) => "✅ Acceptable",
            (Self::LoanToValue, true) => "✅ Within Limit",
            (Self::DebtToIncome, false) | (Self::LoanToValue, false) => "❌ Too High",
        }
    }
}

/// Outcome of a single rule with the figures it was judged on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    pub rule: ApprovalRule,
    pub passed: bool,
    pub notes: String,
}

pub(crate) struct ApprovalSignals {
    pub credit_score: i32,
    pub dti_ratio: f64,
    pub ltv_ratio: f64,
    pub down_payment_ratio: f64,
}

/// Checks every rule; none short-circuits so the report always carries the full breakdown.
pub(crate) fn check_rules(signals: &ApprovalSignals, policy: &ApprovalPolicy) -> Vec<RuleVerdict> {
    ApprovalRule::ordered()
        .into_iter()
        .map(|rule| check_rule(rule, signals, policy))
        .collect()
}

fn check_rule(rule: ApprovalRule, signals: &ApprovalSignals, policy: &ApprovalPolicy) -> RuleVerdict {
    let (passed, notes) = match rule {
        ApprovalRule::CreditScore => {
            let passed = signals.credit_score >= policy.minimum_credit_score;
            let relation = if passed { "meets" } else { "below" };
            (
                passed,
                format!(
                    "credit score {} {relation} minimum {}",
                    signals.credit_score, policy.minimum_credit_score
                ),
            )
        }
        ApprovalRule::DebtToIncome => {
            let passed = signals.dti_ratio <= policy.maximum_dti_ratio;
            let relation = if passed { "within" } else { "exceeds" };
            (
                passed,
                format!(
                    "debt-to-income {:.2}% {relation} limit {:.2}%",
                    signals.dti_ratio, policy.maximum_dti_ratio
                ),
            )
        }
        ApprovalRule::LoanToValue => {
            let passed = signals.ltv_ratio <= policy.maximum_ltv_ratio;
            let relation = if passed { "within" } else { "exceeds" };
            (
                passed,
                format!(
                    "loan-to-value {:.2}% {relation} limit {:.2}%",
                    signals.ltv_ratio, policy.maximum_ltv_ratio
                ),
            )
        }
        ApprovalRule::DownPayment => {
            let passed = signals.down_payment_ratio >= policy.minimum_down_payment_ratio;
            let relation = if passed { "meets" } else { "below" };
            (
                passed,
                format!(
                    "down payment {:.2}% {relation} minimum {:.2}%",
                    signals.down_payment_ratio, policy.minimum_down_payment_ratio
                ),
            )
        }
    };

    RuleVerdict {
        rule,
        passed,
        notes,
    }
}
