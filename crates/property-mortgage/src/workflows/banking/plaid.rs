use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::{BankLinkError, BankLinkProvider, LinkToken, PlaidEnvironment, TokenExchange};

const CLIENT_NAME: &str = "California Property Mortgage";

/// Plaid REST client authenticating with client id and secret in each body.
#[derive(Clone)]
pub struct PlaidClient {
    http: reqwest::Client,
    client_id: String,
    secret: String,
    environment: PlaidEnvironment,
    base_url: String,
}

impl std::fmt::Debug for PlaidClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidClient")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl PlaidClient {
    pub fn new(
        http: reqwest::Client,
        client_id: impl Into<String>,
        secret: impl Into<String>,
        environment: PlaidEnvironment,
    ) -> Self {
        Self {
            http,
            client_id: client_id.into(),
            secret: secret.into(),
            environment,
            base_url: environment.base_url(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn authenticated(&self, mut body: serde_json::Value) -> serde_json::Value {
        if let Some(fields) = body.as_object_mut() {
            fields.insert("client_id".to_string(), json!(self.client_id));
            fields.insert("secret".to_string(), json!(self.secret));
        }
        body
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BankLinkError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(%url, "calling plaid");
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(BankLinkError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| BankLinkError::Malformed(err.to_string()))
    }
}

pub(crate) fn link_token_request(client_user_id: &str) -> serde_json::Value {
    json!({
        "client_name": CLIENT_NAME,
        "products": ["auth", "transactions"],
        "country_codes": ["US"],
        "language": "en",
        "user": { "client_user_id": client_user_id },
    })
}

#[async_trait]
impl BankLinkProvider for PlaidClient {
    fn environment(&self) -> PlaidEnvironment {
        self.environment
    }

    async fn create_link_token(&self) -> Result<LinkToken, BankLinkError> {
        let client_user_id = Uuid::new_v4().to_string();
        let body = self.authenticated(link_token_request(&client_user_id));
        let token: LinkToken = self.post("/link/token/create", &body).await?;
        info!(request_id = %token.request_id, "created plaid link token");
        Ok(token)
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<TokenExchange, BankLinkError> {
        let body = self.authenticated(json!({ "public_token": public_token }));
        self.post("/item/public_token/exchange", &body).await
    }

    async fn account_balances(
        &self,
        access_token: &str,
    ) -> Result<serde_json::Value, BankLinkError> {
        let body = self.authenticated(json!({ "access_token": access_token }));
        self.post("/accounts/balance/get", &body).await
    }
}
