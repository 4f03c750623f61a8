use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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

const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;
const DEFAULT_COMPANION_MODEL: &str = "gemini-2.0-flash-exp";
const DEFAULT_COMPANION_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_COMPANION_TIMEOUT_MS: u64 = 20_000;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub companion: CompanionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_input_chars = match env::var("GRADER_MAX_INPUT_CHARS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidNumber {
                    variable: "GRADER_MAX_INPUT_CHARS",
                })?,
            Err(_) => DEFAULT_MAX_INPUT_CHARS,
        };

        let sentiment_lexicon = match env::var("GRADER_SENTIMENT_LEXICON") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidFlag {
                variable: "GRADER_SENTIMENT_LEXICON",
            })?,
            Err(_) => true,
        };

        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_COMPANION_MODEL.to_string());
        let base_url =
            env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_COMPANION_BASE_URL.to_string());
        let timeout_ms = match env::var("GEMINI_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    variable: "GEMINI_TIMEOUT_MS",
                })?,
            Err(_) => DEFAULT_COMPANION_TIMEOUT_MS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                max_input_chars,
                sentiment_lexicon,
            },
            companion: CompanionConfig {
                api_key,
                model,
                base_url,
                timeout_ms,
            },
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Engine limits and optional capability switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    pub max_input_chars: usize,
    pub sentiment_lexicon: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            sentiment_lexicon: true,
        }
    }
}

/// Upstream settings for the companion LLM evaluator.
#[derive(Clone)]
pub struct CompanionConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl CompanionConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_COMPANION_MODEL.to_string(),
            base_url: DEFAULT_COMPANION_BASE_URL.to_string(),
            timeout_ms: DEFAULT_COMPANION_TIMEOUT_MS,
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for CompanionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str },
    InvalidFlag { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable } => {
                write!(f, "{variable} must be a positive integer")
            }
            ConfigError::InvalidFlag { variable } => {
                write!(f, "{variable} must be one of true/false/1/0/yes/no/on/off")
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
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}
