use super::domain::MortgageContext;

pub const ADVISOR_SIGNATURE: &str = "Best regards,\nBestie, Senior Mortgage Advisor";

/// Persona and borrower context sent ahead of the conversation history.
pub fn system_prompt(context: &MortgageContext) -> String {
    let property = &context.property_info;
    let financial = &context.financial_info;

    let address = property.address.as_deref().unwrap_or("Not provided");
    let price = format_currency(property.price.unwrap_or(0.0));
    let income = format_currency(financial.annual_income.unwrap_or(0.0));
    let credit = financial
        .credit_score
        .map(|score| score.to_string())
        .unwrap_or_else(|| "Not provided".to_string());

    format!(
        "You are Bestie, a friendly and knowledgeable Senior Mortgage Advisor.\n\
         You're helping a client with their mortgage application for:\n\
         \n\
         Property Details:\n\
         - Address: {address}\n\
         - Price: {price}\n\
         \n\
         Financial Information:\n\
         - Annual Income: {income}\n\
         - Credit Score: {credit}\n\
         \n\
         Please provide helpful, accurate, and professional advice based on this information.\n\
         Keep responses concise but informative, and always maintain a friendly, professional tone.\n\
         Format amounts with commas and currency symbols (e.g., $500,000).\n\
         Sign off each response with 'Best regards, Bestie, Senior Mortgage Advisor'"
    )
}

/// Whole-dollar amount with thousands separators, e.g. `$1,250,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Two-decimal variant used for monthly payment estimates, e.g. `$2,400.00`.
pub fn format_currency_cents(amount: f64) -> String {
    let total_cents = (amount * 100.0).round();
    let sign = if total_cents < 0.0 { "-" } else { "" };
    let total_cents = total_cents.abs() as u64;
    let dollars = format_currency((total_cents / 100) as f64);
    format!("{sign}{dollars}.{:02}", total_cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::chat::domain::{FinancialInfo, PropertyInfo};

    #[test]
    fn currency_is_grouped_by_thousands() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(950.0), "$950");
        assert_eq!(format_currency(500_000.0), "$500,000");
        assert_eq!(format_currency(1_250_000.4), "$1,250,000");
        assert_eq!(format_currency_cents(2_400.0), "$2,400.00");
        assert_eq!(format_currency_cents(1_796.18), "$1,796.18");
    }

    #[test]
    fn cents_rounding_carries_into_dollars() {
        assert_eq!(format_currency_cents(1_999.996), "$2,000.00");
        assert_eq!(format_currency_cents(499_999.0 * 0.004), "$2,000.00");
        assert_eq!(format_currency_cents(0.999), "$1.00");
    }

    #[test]
    fn negative_cents_keep_their_sign() {
        assert_eq!(format_currency_cents(-0.5), "-$0.50");
        assert_eq!(format_currency_cents(-1_250.25), "-$1,250.25");
        assert_eq!(format_currency_cents(-0.001), "$0.00");
    }

    #[test]
    fn prompt_includes_borrower_context() {
        let context = MortgageContext {
            user_id: Some("u-1".to_string()),
            property_info: PropertyInfo {
                address: Some("123 Main St, Fresno".to_string()),
                price: Some(600_000.0),
            },
            financial_info: FinancialInfo {
                annual_income: Some(120_000.0),
                credit_score: Some(720),
            },
        };

        let prompt = system_prompt(&context);

        assert!(prompt.contains("123 Main St, Fresno"));
        assert!(prompt.contains("$600,000"));
        assert!(prompt.contains("$120,000"));
        assert!(prompt.contains("Credit Score: 720"));
    }

    #[test]
    fn prompt_marks_missing_fields() {
        let prompt = system_prompt(&MortgageContext::default());

        assert!(prompt.contains("Address: Not provided"));
        assert!(prompt.contains("Credit Score: Not provided"));
    }
}
