use serde::{Deserialize, Serialize};

/// Approval thresholds. Ratios are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    pub minimum_credit_score: i32,
    pub maximum_dti_ratio: f64,
    pub maximum_ltv_ratio: f64,
    pub minimum_down_payment_ratio: f64,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self {
            minimum_credit_score: 620,
            maximum_dti_ratio: 43.0,
            maximum_ltv_ratio: 80.0,
            minimum_down_payment_ratio: 20.0,
        }
    }
}
