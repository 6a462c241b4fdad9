use super::rules::{ApprovalRule, RuleVerdict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall affordability decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Approved,
    Denied,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "Approved",
            ApprovalStatus::Denied => "Denied",
        }
    }
}

/// Per-rule verdicts plus the decision they produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalReport {
    pub status: ApprovalStatus,
    pub verdicts: Vec<RuleVerdict>,
}

impl ApprovalReport {
    pub fn passed(&self, rule: ApprovalRule) -> Option<bool> {
        self.verdicts
            .iter()
            .find(|verdict| verdict.rule == rule)
            .map(|verdict| verdict.passed)
    }

    /// Verdicts keyed by rule name, e.g. `dti_ok -> false`.
    pub fn checks(&self) -> BTreeMap<&'static str, bool> {
        self.verdicts
            .iter()
            .map(|verdict| (verdict.rule.name(), verdict.passed))
            .collect()
    }

    /// Human-readable indicators keyed by rule label.
    pub fn details(&self) -> BTreeMap<&'static str, &'static str> {
        self.verdicts
            .iter()
            .map(|verdict| (verdict.rule.label(), verdict.rule.indicator(verdict.passed)))
            .collect()
    }

    pub fn failed_rules(&self) -> Vec<ApprovalRule> {
        self.verdicts
            .iter()
            .filter(|verdict| !verdict.passed)
            .map(|verdict| verdict.rule)
            .collect()
    }
}

pub(crate) fn decide_status(verdicts: &[RuleVerdict]) -> ApprovalStatus {
    if verdicts.iter().all(|verdict| verdict.passed) {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Denied
    }
}
