use crate::cli::ServeArgs;
use crate::infra::{
    bank_provider, chat_provider, conversation_store, http_client, load_catalog, rate_provider,
    AppState,
};
use crate::routes::with_operational_routes;
use axum::http::HeaderValue;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayer;
use property_mortgage::config::{AppConfig, ServerConfig};
use property_mortgage::error::AppError;
use property_mortgage::telemetry;
use property_mortgage::workflows::banking::{banking_router, BankLinkService};
use property_mortgage::workflows::chat::{chat_router, AdvisorChatService};
use property_mortgage::workflows::mortgage::{mortgage_router, MortgageAnalysisService};
use property_mortgage::workflows::properties::properties_router;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = build_router(&config)?
        .layer(Extension(app_state))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "property mortgage service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Wires every workflow router against the configured providers.
pub(crate) fn build_router(config: &AppConfig) -> Result<Router, AppError> {
    let http = http_client();

    let catalog = Arc::new(load_catalog(&config.data.property_csv)?);
    let mortgage = Arc::new(MortgageAnalysisService::new(
        Arc::new(rate_provider(config, &http)),
        config.mortgage.policy.clone(),
        config.mortgage.fallback_rate,
    ));
    let chat = Arc::new(AdvisorChatService::new(
        conversation_store(config),
        Arc::new(chat_provider(config, &http)),
    ));
    let banking = Arc::new(BankLinkService::new(
        bank_provider(config, &http).map(Arc::new),
    ));
    if !banking.is_configured() {
        info!("PLAID_CLIENT_ID/PLAID_SECRET not set, bank linking disabled");
    }

    let router = Router::new()
        .merge(mortgage_router(mortgage))
        .merge(properties_router(catalog))
        .merge(chat_router(chat))
        .merge(banking_router(banking));

    Ok(with_operational_routes(router))
}

pub(crate) fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
