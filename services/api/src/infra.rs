use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use property_mortgage::config::AppConfig;
use property_mortgage::error::AppError;
use property_mortgage::workflows::banking::PlaidClient;
use property_mortgage::workflows::chat::{
    CompletionSettings, ConfiguredChatProvider, ConversationPolicy, ConversationStore,
    OpenAiChatClient, ScriptedAdvisor,
};
use property_mortgage::workflows::properties::{CatalogError, PropertyCatalog};
use property_mortgage::workflows::rates::{
    ConfiguredRateProvider, FixedRateProvider, FredRateClient,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

const UPSTREAM_TIMEOUT_SECS: u64 = 15;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default http client");
            reqwest::Client::new()
        })
}

pub(crate) fn rate_provider(config: &AppConfig, http: &reqwest::Client) -> ConfiguredRateProvider {
    match &config.providers.fred {
        Some(fred) => ConfiguredRateProvider::Fred(FredRateClient::new(
            http.clone(),
            fred.api_key.clone(),
        )),
        None => {
            info!(
                rate = config.mortgage.fallback_rate,
                "FRED_API_KEY not set, serving the fallback rate"
            );
            ConfiguredRateProvider::Fixed(FixedRateProvider::new(
                config.mortgage.fallback_rate,
                Utc::now().date_naive(),
            ))
        }
    }
}

pub(crate) fn chat_provider(config: &AppConfig, http: &reqwest::Client) -> ConfiguredChatProvider {
    match &config.providers.openai {
        Some(openai) => ConfiguredChatProvider::OpenAi(OpenAiChatClient::new(
            http.clone(),
            openai.api_key.clone(),
            CompletionSettings::for_model(openai.model.clone()),
        )),
        None => {
            info!("OPENAI_API_KEY not set, using the scripted advisor");
            ConfiguredChatProvider::Scripted(ScriptedAdvisor)
        }
    }
}

pub(crate) fn bank_provider(config: &AppConfig, http: &reqwest::Client) -> Option<PlaidClient> {
    let plaid = config.providers.plaid.as_ref()?;
    Some(PlaidClient::new(
        http.clone(),
        plaid.client_id.clone(),
        plaid.secret.clone(),
        plaid.environment,
    ))
}

pub(crate) fn conversation_store(config: &AppConfig) -> ConversationStore {
    ConversationStore::new(ConversationPolicy {
        max_conversations: config.chat.max_conversations,
        idle_ttl: config.chat.idle_ttl,
        ..ConversationPolicy::default()
    })
}

/// Loads the listing catalog; a missing file leaves the service up with no listings.
pub(crate) fn load_catalog(path: &Path) -> Result<PropertyCatalog, AppError> {
    match PropertyCatalog::from_path(path) {
        Ok(catalog) => Ok(catalog),
        Err(CatalogError::Missing { path }) => {
            warn!(path = %path.display(), "property data file missing, serving no listings");
            Ok(PropertyCatalog::default())
        }
        Err(err) => Err(err.into()),
    }
}
