use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn analysis_request(payload: serde_json::Value) -> Request<Body> {
    Request::post("/api/mortgage-analysis")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("payload serializes")))
        .expect("request builds")
}

#[tokio::test]
async fn analysis_route_returns_breakdown() {
    let router = router_with(Arc::new(StaticRates::new(6.0)));

    let response = router
        .oneshot(analysis_request(json!({
            "home_value": 500000,
            "loan_amount": 400000,
            "down_payment": 100000,
            "annual_income": 120000,
            "total_debt": 15000,
            "credit_score": 720,
            "financing_rate": 3.5
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval_status"], json!("Denied"));
    assert_eq!(payload["LTV_ratio"], json!(80.0));
    assert_eq!(payload["DTI_ratio"], json!(150.0));
    assert_eq!(payload["monthly_payment"], json!(1796.18));
    assert_eq!(payload["rate_source"], json!("requested"));
    assert_eq!(payload["approval_details"]["DTI Ratio"], json!("❌ Too High"));
    assert_eq!(payload["approval_checks"]["ltv_ok"], json!(true));
    assert_eq!(
        payload["approval_details"]
            .as_object()
            .map(|details| details.len()),
        Some(4)
    );
}

#[tokio::test]
async fn analysis_route_rejects_invalid_figures() {
    let router = router_with(Arc::new(StaticRates::new(6.0)));

    let response = router
        .oneshot(analysis_request(json!({
            "home_value": 500000,
            "loan_amount": 400000,
            "down_payment": 100000,
            "annual_income": 0,
            "total_debt": 1500,
            "credit_score": 720
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], json!("annual_income"));
}

#[tokio::test]
async fn analysis_route_keeps_payment_numeric_at_extreme_rates() {
    let router = router_with(Arc::new(StaticRates::new(6.0)));

    let response = router
        .oneshot(analysis_request(json!({
            "home_value": 500000,
            "loan_amount": 400000,
            "down_payment": 100000,
            "annual_income": 120000,
            "total_debt": 1000,
            "credit_score": 720,
            "financing_rate": 100000
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload["monthly_payment"].is_f64());
}

#[tokio::test]
async fn analysis_route_rejects_unrepresentable_payment() {
    let router = router_with(Arc::new(StaticRates::new(6.0)));

    let response = router
        .oneshot(analysis_request(json!({
            "home_value": 1.25e300,
            "loan_amount": 1e300,
            "down_payment": 0,
            "annual_income": 120000,
            "total_debt": 0,
            "credit_score": 720,
            "financing_rate": 1e300
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], json!("financing_rate"));
}

#[tokio::test]
async fn historical_route_reports_upstream_failure() {
    let router = router_with(Arc::new(OfflineRates));

    let response = router
        .oneshot(
            Request::get("/api/mortgage-rates/historical")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn historical_route_lists_observations() {
    let router = router_with(Arc::new(StaticRates::new(6.0)));

    let response = router
        .oneshot(
            Request::get("/api/mortgage-rates/historical")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let observations = payload.as_array().expect("array payload");
    assert_eq!(observations.len(), 12);
    assert_eq!(observations[0]["date"], json!("2024-10-10"));
}
