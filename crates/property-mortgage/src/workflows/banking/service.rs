use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{BankLinkError, BankLinkProvider, LinkToken, PlaidEnvironment};

/// Borrower figures attached to sandbox exchanges so the mortgage form can be pre-filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub income: f64,
    pub debt: f64,
    pub credit_score: i32,
}

impl FinancialProfile {
    pub const SANDBOX: FinancialProfile = FinancialProfile {
        income: 120_000.0,
        debt: 15_000.0,
        credit_score: 720,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    pub access_token: String,
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_profile: Option<FinancialProfile>,
}

#[derive(Debug, thiserror::Error)]
pub enum BankLinkServiceError {
    #[error("Bank linking is not configured")]
    NotConfigured,
    #[error("{0} must not be empty")]
    MissingToken(&'static str),
    #[error(transparent)]
    Provider(#[from] BankLinkError),
}

/// Bank linking facade; the provider is absent when no Plaid credentials are configured.
pub struct BankLinkService<P> {
    provider: Option<Arc<P>>,
}

impl<P> BankLinkService<P>
where
    P: BankLinkProvider + 'static,
{
    pub fn new(provider: Option<Arc<P>>) -> Self {
        Self { provider }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> Result<&P, BankLinkServiceError> {
        self.provider
            .as_deref()
            .ok_or(BankLinkServiceError::NotConfigured)
    }

    pub async fn create_link_token(&self) -> Result<LinkToken, BankLinkServiceError> {
        Ok(self.provider()?.create_link_token().await?)
    }

    pub async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangeOutcome, BankLinkServiceError> {
        let provider = self.provider()?;
        let public_token = public_token.trim();
        if public_token.is_empty() {
            return Err(BankLinkServiceError::MissingToken("public_token"));
        }

        let exchange = provider.exchange_public_token(public_token).await?;
        let financial_profile = match provider.environment() {
            PlaidEnvironment::Sandbox => Some(FinancialProfile::SANDBOX),
            PlaidEnvironment::Development | PlaidEnvironment::Production => None,
        };
        info!(item_id = %exchange.item_id, "exchanged plaid public token");

        Ok(ExchangeOutcome {
            access_token: exchange.access_token,
            item_id: exchange.item_id,
            financial_profile,
        })
    }

    pub async fn account_balances(
        &self,
        access_token: &str,
    ) -> Result<serde_json::Value, BankLinkServiceError> {
        let provider = self.provider()?;
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(BankLinkServiceError::MissingToken("access_token"));
        }
        Ok(provider.account_balances(access_token).await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::workflows::banking::TokenExchange;

    /// In-memory Plaid stand-in.
    pub(crate) struct FakeBank {
        pub(crate) environment: PlaidEnvironment,
        pub(crate) fail: bool,
    }

    impl FakeBank {
        pub(crate) fn sandbox() -> Self {
            Self {
                environment: PlaidEnvironment::Sandbox,
                fail: false,
            }
        }

        fn check(&self) -> Result<(), BankLinkError> {
            if self.fail {
                return Err(BankLinkError::Status {
                    status: 400,
                    body: "INVALID_PUBLIC_TOKEN".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BankLinkProvider for FakeBank {
        fn environment(&self) -> PlaidEnvironment {
            self.environment
        }

        async fn create_link_token(&self) -> Result<LinkToken, BankLinkError> {
            self.check()?;
            Ok(LinkToken {
                link_token: "link-sandbox-123".to_string(),
                expiration: "2024-10-10T16:00:00Z".to_string(),
                request_id: "req-1".to_string(),
            })
        }

        async fn exchange_public_token(
            &self,
            public_token: &str,
        ) -> Result<TokenExchange, BankLinkError> {
            self.check()?;
            Ok(TokenExchange {
                access_token: format!("access-for-{public_token}"),
                item_id: "item-1".to_string(),
            })
        }

        async fn account_balances(
            &self,
            access_token: &str,
        ) -> Result<serde_json::Value, BankLinkError> {
            self.check()?;
            Ok(json!({ "accounts": [{ "account_id": "acc-1", "token": access_token }] }))
        }
    }

    #[tokio::test]
    async fn sandbox_exchange_attaches_profile() {
        let service = BankLinkService::new(Some(Arc::new(FakeBank::sandbox())));
        let outcome = service
            .exchange_public_token("public-sandbox-1")
            .await
            .expect("exchange");

        assert_eq!(outcome.access_token, "access-for-public-sandbox-1");
        assert_eq!(outcome.financial_profile, Some(FinancialProfile::SANDBOX));
    }

    #[tokio::test]
    async fn production_exchange_has_no_placeholder_profile() {
        let service = BankLinkService::new(Some(Arc::new(FakeBank {
            environment: PlaidEnvironment::Production,
            fail: false,
        })));
        let outcome = service
            .exchange_public_token("public-1")
            .await
            .expect("exchange");

        assert!(outcome.financial_profile.is_none());
    }

    #[tokio::test]
    async fn unconfigured_service_refuses() {
        let service: BankLinkService<FakeBank> = BankLinkService::new(None);
        assert!(!service.is_configured());
        assert!(matches!(
            service.create_link_token().await,
            Err(BankLinkServiceError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn blank_tokens_are_rejected() {
        let service = BankLinkService::new(Some(Arc::new(FakeBank::sandbox())));
        assert!(matches!(
            service.account_balances("  ").await,
            Err(BankLinkServiceError::MissingToken("access_token"))
        ));
    }
}
