use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::service::{BankLinkService, BankLinkServiceError};
use super::BankLinkProvider;

#[derive(Debug, Deserialize)]
pub(crate) struct PublicTokenRequest {
    public_token: String,
}

/// Router exposing Plaid link token creation, token exchange, and balances.
pub fn banking_router<P>(service: Arc<BankLinkService<P>>) -> Router
where
    P: BankLinkProvider + 'static,
{
    Router::new()
        .route("/api/create_link_token", post(create_link_token_handler::<P>))
        .route("/api/exchange_token", post(exchange_token_handler::<P>))
        .route("/api/accounts/:access_token", get(accounts_handler::<P>))
        .with_state(service)
}

fn error_response(err: BankLinkServiceError) -> Response {
    let status = match &err {
        BankLinkServiceError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        BankLinkServiceError::MissingToken(_) => StatusCode::BAD_REQUEST,
        BankLinkServiceError::Provider(_) => {
            error!(error = %err, "bank link call failed");
            StatusCode::BAD_GATEWAY
        }
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) async fn create_link_token_handler<P>(
    State(service): State<Arc<BankLinkService<P>>>,
) -> Response
where
    P: BankLinkProvider + 'static,
{
    match service.create_link_token().await {
        Ok(token) => (StatusCode::OK, axum::Json(token)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn exchange_token_handler<P>(
    State(service): State<Arc<BankLinkService<P>>>,
    axum::Json(request): axum::Json<PublicTokenRequest>,
) -> Response
where
    P: BankLinkProvider + 'static,
{
    match service.exchange_public_token(&request.public_token).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn accounts_handler<P>(
    State(service): State<Arc<BankLinkService<P>>>,
    Path(access_token): Path<String>,
) -> Response
where
    P: BankLinkProvider + 'static,
{
    match service.account_balances(&access_token).await {
        Ok(balances) => (StatusCode::OK, axum::Json(balances)).into_response(),
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::workflows::banking::service::tests::FakeBank;

    fn router(bank: Option<FakeBank>) -> Router {
        banking_router(Arc::new(BankLinkService::new(bank.map(Arc::new))))
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn exchange_returns_profile() {
        let response = router(Some(FakeBank::sandbox()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/exchange_token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"public_token":"public-sandbox-9"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["access_token"], "access-for-public-sandbox-9");
        assert_eq!(body["financial_profile"]["credit_score"], 720);
    }

    #[tokio::test]
    async fn unconfigured_link_token_is_unavailable() {
        let response = router(None)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/create_link_token")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let response = router(Some(FakeBank {
            fail: true,
            ..FakeBank::sandbox()
        }))
        .oneshot(
            Request::builder()
                .uri("/api/accounts/access-1")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
