use super::domain::{AffordabilityResult, InvalidInputError, LoanApplication};
use super::evaluation::validate_credit_score;

/// Fixed 30-year term.
pub const LOAN_TERM_MONTHS: i32 = 360;

/// Derives DTI, LTV, down-payment ratio, and the fixed-rate monthly payment.
///
/// `total_debt` is a monthly figure and is compared against `annual_income / 12`.
pub fn compute(
    loan_amount: f64,
    home_value: f64,
    down_payment: f64,
    annual_income: f64,
    total_debt: f64,
    annual_rate_percent: f64,
) -> Result<AffordabilityResult, InvalidInputError> {
    require_positive("loan_amount", loan_amount)?;
    require_positive("home_value", home_value)?;
    require_non_negative("down_payment", down_payment)?;
    require_positive("annual_income", annual_income)?;
    require_non_negative("total_debt", total_debt)?;
    require_non_negative("financing_rate", annual_rate_percent)?;

    let monthly_income = annual_income / 12.0;
    let payment = monthly_payment(loan_amount, annual_rate_percent);
    if !payment.is_finite() {
        return Err(InvalidInputError::new(
            "financing_rate",
            format!("produces an unrepresentable payment at {annual_rate_percent}%"),
        ));
    }

    Ok(AffordabilityResult {
        monthly_payment: payment,
        dti_ratio: total_debt / monthly_income * 100.0,
        ltv_ratio: loan_amount / home_value * 100.0,
        down_payment_ratio: down_payment / home_value * 100.0,
    })
}

/// Checks every rate-independent figure so a bad request fails before any rate lookup.
pub fn validate_application(application: &LoanApplication) -> Result<(), InvalidInputError> {
    require_positive("home_value", application.home_value)?;
    require_positive("loan_amount", application.loan_amount)?;
    require_non_negative("down_payment", application.down_payment)?;
    require_positive("annual_income", application.annual_income)?;
    require_non_negative("total_debt", application.total_debt)?;
    if let Some(rate) = application.financing_rate {
        require_non_negative("financing_rate", rate)?;
    }
    validate_credit_score(application.credit_score)
}

/// Standard amortization over [`LOAN_TERM_MONTHS`]; a zero rate pays principal straight-line.
///
/// When compounding overflows, the payment converges to interest only (`principal * rate`).
pub fn monthly_payment(principal: f64, annual_rate_percent: f64) -> f64 {
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;
    if monthly_rate == 0.0 {
        return principal / f64::from(LOAN_TERM_MONTHS);
    }

    let growth = (1.0 + monthly_rate).powi(LOAN_TERM_MONTHS);
    if !growth.is_finite() {
        return principal * monthly_rate;
    }
    principal * monthly_rate * growth / (growth - 1.0)
}

fn require_positive(field: &'static str, value: f64) -> Result<(), InvalidInputError> {
    if !value.is_finite() {
        return Err(InvalidInputError::new(field, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(InvalidInputError::new(
            field,
            format!("must be greater than zero (got {value})"),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), InvalidInputError> {
    if !value.is_finite() {
        return Err(InvalidInputError::new(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(InvalidInputError::new(
            field,
            format!("must not be negative (got {value})"),
        ));
    }
    Ok(())
}
