use crate::infra::{http_client, rate_provider};
use clap::Args;
use property_mortgage::config::AppConfig;
use property_mortgage::error::AppError;
use property_mortgage::workflows::chat::prompt::format_currency;
use property_mortgage::workflows::mortgage::{
    LoanApplication, MortgageAnalysis, MortgageAnalysisService,
};
use property_mortgage::workflows::properties::{PropertyCatalog, PropertyListing, PropertyQuery};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Appraised home value in dollars
    #[arg(long)]
    pub(crate) home_value: f64,
    /// Requested loan principal in dollars
    #[arg(long)]
    pub(crate) loan_amount: f64,
    /// Cash down payment in dollars
    #[arg(long)]
    pub(crate) down_payment: f64,
    /// Gross annual income in dollars
    #[arg(long)]
    pub(crate) annual_income: f64,
    /// Monthly debt obligations in dollars
    #[arg(long)]
    pub(crate) total_debt: f64,
    /// Borrower credit score (300-850)
    #[arg(long)]
    pub(crate) credit_score: i32,
    /// Annual rate in percent. Looks up the market rate when omitted.
    #[arg(long)]
    pub(crate) rate: Option<f64>,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Listing CSV (defaults to PROPERTY_DATA_PATH)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) ne_lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) ne_lng: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) sw_lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) sw_lng: Option<f64>,
    /// Maximum number of listings to print
    #[arg(long, default_value_t = 25)]
    pub(crate) limit: usize,
}

impl From<&AnalyzeArgs> for LoanApplication {
    fn from(args: &AnalyzeArgs) -> Self {
        LoanApplication {
            home_value: args.home_value,
            loan_amount: args.loan_amount,
            down_payment: args.down_payment,
            annual_income: args.annual_income,
            total_debt: args.total_debt,
            credit_score: args.credit_score,
            financing_rate: args.rate,
        }
    }
}

pub(crate) async fn run_mortgage_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let rates = Arc::new(rate_provider(&config, &http_client()));
    let service = MortgageAnalysisService::new(
        rates,
        config.mortgage.policy.clone(),
        config.mortgage.fallback_rate,
    );

    let analysis = service.analyze(LoanApplication::from(&args)).await?;
    for line in render_analysis(&analysis) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn render_analysis(analysis: &MortgageAnalysis) -> Vec<String> {
    let view = analysis.view();
    let mut lines = vec![
        format!("Mortgage analysis: {}", view.approval_status),
        format!(
            "- Rate: {:.2}% ({:?})",
            view.mortgage_rate, view.rate_source
        ),
        format!("- Monthly payment: ${:.2}", view.monthly_payment),
        format!("- DTI ratio: {:.2}%", view.dti_ratio),
        format!("- LTV ratio: {:.2}%", view.ltv_ratio),
        format!("- Down payment ratio: {:.2}%", view.down_payment_ratio),
        "Approval checks:".to_string(),
    ];
    for verdict in &analysis.report.verdicts {
        lines.push(format!(
            "  - {}: {} ({})",
            verdict.rule.label(),
            verdict.rule.indicator(verdict.passed),
            verdict.notes
        ));
    }
    lines
}

pub(crate) fn run_property_listing(args: ListArgs) -> Result<(), AppError> {
    let path = match args.csv.clone() {
        Some(path) => path,
        None => AppConfig::load()?.data.property_csv,
    };
    let catalog = PropertyCatalog::from_path(&path)?;

    let query = PropertyQuery {
        ne_lat: args.ne_lat,
        ne_lng: args.ne_lng,
        sw_lat: args.sw_lat,
        sw_lng: args.sw_lng,
    };
    let matches = catalog.search(query.bounding_box());

    println!(
        "{} of {} listings match ({})",
        matches.len(),
        catalog.len(),
        path.display()
    );
    for listing in matches.iter().take(args.limit) {
        println!("{}", render_listing(listing));
    }
    if matches.len() > args.limit {
        println!("... {} more", matches.len() - args.limit);
    }
    Ok(())
}

pub(crate) fn render_listing(listing: &PropertyListing) -> String {
    format!(
        "- [{}] {}, {} {} | {} | ({:.4}, {:.4})",
        listing.region_id,
        listing.city,
        listing.state,
        listing.zipcode,
        format_currency(listing.price),
        listing.latitude,
        listing.longitude
    )
}
