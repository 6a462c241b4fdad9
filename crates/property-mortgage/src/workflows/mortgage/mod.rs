//! Mortgage affordability: amortization, underwriting ratios, and approval policy.

pub mod calculator;
pub mod domain;
pub mod evaluation;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use calculator::{compute, monthly_payment, LOAN_TERM_MONTHS};
pub use domain::{AffordabilityResult, InvalidInputError, LoanApplication, RateSource};
pub use evaluation::{
    ApprovalEngine, ApprovalPolicy, ApprovalReport, ApprovalRule, ApprovalStatus, RuleVerdict,
};
pub use router::mortgage_router;
pub use service::{MortgageAnalysis, MortgageAnalysisService, MortgageAnalysisView};
