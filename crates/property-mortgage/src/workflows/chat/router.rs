use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::ChatRequest;
use super::provider::ChatProvider;
use super::service::{AdvisorChatService, ChatServiceError};

/// Router exposing the advisor conversation endpoint.
pub fn chat_router<P>(service: Arc<AdvisorChatService<P>>) -> Router
where
    P: ChatProvider + 'static,
{
    Router::new()
        .route("/api/chat/with-history", post(chat_handler::<P>))
        .with_state(service)
}

pub(crate) async fn chat_handler<P>(
    State(service): State<Arc<AdvisorChatService<P>>>,
    axum::Json(request): axum::Json<ChatRequest>,
) -> Response
where
    P: ChatProvider + 'static,
{
    match service.reply(request, Utc::now()).await {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(err) => {
            let status = match err {
                ChatServiceError::MissingContext | ChatServiceError::EmptyMessage => {
                    StatusCode::BAD_REQUEST
                }
                ChatServiceError::Provider(_) => StatusCode::BAD_GATEWAY,
            };
            let payload = json!({ "error": err.to_string() });
            (status, axum::Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::workflows::chat::provider::ScriptedAdvisor;
    use crate::workflows::chat::store::ConversationStore;

    fn router() -> Router {
        chat_router(Arc::new(AdvisorChatService::new(
            ConversationStore::default(),
            Arc::new(ScriptedAdvisor),
        )))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat/with-history")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn answers_with_scripted_advisor() {
        let response = router()
            .oneshot(post_json(json!({
                "content": "What is my monthly payment?",
                "mortgage_data": {
                    "userId": "u-7",
                    "propertyInfo": { "address": "1 Main St", "price": 500000 },
                    "financialInfo": { "annual_income": 120000, "credit_score": 720 }
                }
            })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let content = body["content"].as_str().expect("content");
        assert!(content.contains("$2,000.00"));
    }

    #[tokio::test]
    async fn missing_context_is_bad_request() {
        let response = router()
            .oneshot(post_json(json!({ "content": "hello" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing mortgage context");
    }
}
