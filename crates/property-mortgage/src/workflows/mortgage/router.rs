use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::LoanApplication;
use super::service::{MortgageAnalysisService, MortgageAnalysisView};
use crate::error::AppError;
use crate::workflows::rates::RateProvider;

/// Router exposing affordability analysis and the rate history feed.
pub fn mortgage_router<P>(service: Arc<MortgageAnalysisService<P>>) -> Router
where
    P: RateProvider + 'static,
{
    Router::new()
        .route("/api/mortgage-analysis", post(analysis_handler::<P>))
        .route(
            "/api/mortgage-rates/historical",
            get(historical_rates_handler::<P>),
        )
        .with_state(service)
}

pub(crate) async fn analysis_handler<P>(
    State(service): State<Arc<MortgageAnalysisService<P>>>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Result<axum::Json<MortgageAnalysisView>, AppError>
where
    P: RateProvider + 'static,
{
    let analysis = service.analyze(application).await?;
    Ok(axum::Json(analysis.view()))
}

pub(crate) async fn historical_rates_handler<P>(
    State(service): State<Arc<MortgageAnalysisService<P>>>,
) -> Response
where
    P: RateProvider + 'static,
{
    match service.historical_rates().await {
        Ok(observations) => (StatusCode::OK, axum::Json(observations)).into_response(),
        Err(err) => {
            error!(error = %err, "historical rate lookup failed");
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
