use crate::workflows::banking::PlaidEnvironment;
use crate::workflows::mortgage::evaluation::CREDIT_SCORE_RANGE;
use crate::workflows::mortgage::ApprovalPolicy;
use chrono::Duration;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
    pub mortgage: MortgageConfig,
    pub chat: ChatConfig,
    pub providers: ProviderConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let cors_origins = env::var("APP_CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let include_targets = environment != AppEnvironment::Production;

        let property_csv = env::var("PROPERTY_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/california_properties.csv"));

        let defaults = ApprovalPolicy::default();
        let minimum_credit_score =
            parse_var("MORTGAGE_MIN_CREDIT_SCORE", defaults.minimum_credit_score)?;
        if !CREDIT_SCORE_RANGE.contains(&minimum_credit_score) {
            return Err(ConfigError::OutOfRange {
                variable: "MORTGAGE_MIN_CREDIT_SCORE",
                expected: "a credit score between 300 and 850",
            });
        }
        let policy = ApprovalPolicy {
            minimum_credit_score,
            maximum_dti_ratio: parse_percentage("MORTGAGE_MAX_DTI", defaults.maximum_dti_ratio)?,
            maximum_ltv_ratio: parse_percentage("MORTGAGE_MAX_LTV", defaults.maximum_ltv_ratio)?,
            minimum_down_payment_ratio: parse_percentage(
                "MORTGAGE_MIN_DOWN_PAYMENT",
                defaults.minimum_down_payment_ratio,
            )?,
        };
        let fallback_rate = parse_var("MORTGAGE_FALLBACK_RATE", 3.5_f64)?;
        if !fallback_rate.is_finite() || fallback_rate < 0.0 {
            return Err(ConfigError::InvalidNumber {
                variable: "MORTGAGE_FALLBACK_RATE",
            });
        }

        let max_conversations = parse_var("CHAT_MAX_CONVERSATIONS", 1000_usize)?;
        if max_conversations == 0 {
            return Err(ConfigError::OutOfRange {
                variable: "CHAT_MAX_CONVERSATIONS",
                expected: "at least 1",
            });
        }
        let ttl_minutes = parse_var("CHAT_TTL_MINUTES", 60_i64)?;
        let idle_ttl = Some(ttl_minutes)
            .filter(|minutes| *minutes > 0)
            .and_then(Duration::try_minutes)
            .ok_or(ConfigError::OutOfRange {
                variable: "CHAT_TTL_MINUTES",
                expected: "a positive number of minutes",
            })?;
        let chat = ChatConfig {
            max_conversations,
            idle_ttl,
        };

        let providers = ProviderConfig {
            fred: non_empty_var("FRED_API_KEY").map(|api_key| FredConfig { api_key }),
            plaid: match (non_empty_var("PLAID_CLIENT_ID"), non_empty_var("PLAID_SECRET")) {
                (Some(client_id), Some(secret)) => Some(PlaidConfig {
                    client_id,
                    secret,
                    environment: PlaidEnvironment::parse(
                        &env::var("PLAID_ENV").unwrap_or_else(|_| "sandbox".to_string()),
                    )
                    .ok_or(ConfigError::InvalidPlaidEnvironment)?,
                }),
                _ => None,
            },
            openai: non_empty_var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
                api_key,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            }),
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            telemetry: TelemetryConfig {
                log_level,
                include_targets,
            },
            data: DataConfig { property_csv },
            mortgage: MortgageConfig {
                fallback_rate,
                policy,
            },
            chat,
            providers,
        })
    }
}

fn parse_var<T: FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { variable }),
        _ => Ok(default),
    }
}

/// Parses a percentage threshold, which must be finite and non-negative.
fn parse_percentage(variable: &'static str, default: f64) -> Result<f64, ConfigError> {
    let value = parse_var(variable, default)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::OutOfRange {
            variable,
            expected: "a non-negative percentage",
        });
    }
    Ok(value)
}

fn non_empty_var(variable: &str) -> Option<String> {
    env::var(variable)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub include_targets: bool,
}

#[derive(Debug, Clone)]
pub struct DataConfig {
    pub property_csv: PathBuf,
}

/// Financing defaults and the approval thresholds applied to every analysis.
#[derive(Debug, Clone)]
pub struct MortgageConfig {
    pub fallback_rate: f64,
    pub policy: ApprovalPolicy,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub max_conversations: usize,
    pub idle_ttl: Duration,
}

/// Credentials for upstream providers. A missing entry means the provider is disabled.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub fred: Option<FredConfig>,
    pub plaid: Option<PlaidConfig>,
    pub openai: Option<OpenAiConfig>,
}

#[derive(Clone)]
pub struct FredConfig {
    pub api_key: String,
}

#[derive(Clone)]
pub struct PlaidConfig {
    pub client_id: String,
    pub secret: String,
    pub environment: PlaidEnvironment,
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for FredConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FredConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for PlaidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaidConfig")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .field("environment", &self.environment)
            .finish()
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
    OutOfRange {
        variable: &'static str,
        expected: &'static str,
    },
    InvalidPlaidEnvironment,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a valid non-negative number")
            }
            ConfigError::OutOfRange { variable, expected } => {
                write!(f, "{variable} must be {expected}")
            }
            ConfigError::InvalidPlaidEnvironment => {
                write!(f, "PLAID_ENV must be one of sandbox, development, production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::OutOfRange { .. }
            | ConfigError::InvalidPlaidEnvironment => None,
        }
    }
}
