use crate::models::ClassIndexMap;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_COUNT: u32 = 20;
const DEFAULT_QUERY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct DermagenConfig {
    pub common: core_config::Config,
    pub ai_service: AiServiceConfig,
    pub limits: LimitsConfig,
    pub class_index_map: ClassIndexMap,
}

#[derive(Debug, Clone)]
pub struct AiServiceConfig {
    /// Base URL of the inference service, as configured (normalized by the client).
    pub url: String,
    pub timeout_seconds: u64,
}

impl AiServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LimitsConfig {
    /// Largest image count accepted by `POST /api/generate`.
    pub max_generate_count: u32,
    /// Largest number of records returned by `GET /api/images`.
    pub images_query_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_generate_count: DEFAULT_MAX_COUNT,
            images_query_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl DermagenConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common = core_config::Config::load()?;

        // PORT wins; APP__PORT is honoured when PORT is absent.
        let fallback_port = if env::var("APP__PORT").is_ok() {
            common.port
        } else {
            DEFAULT_PORT
        };
        common.port = parse_env("PORT", fallback_port)?;
        if let Ok(host) = env::var("HOST") {
            common.host = host;
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            common.log_level = level;
        }
        if let Ok(endpoint) = env::var("OTLP_ENDPOINT") {
            common.otlp_endpoint = Some(endpoint);
        }

        let class_index_map = match env::var("CLASS_INDEX_MAP") {
            Ok(spec) => ClassIndexMap::parse_overrides(&spec).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("CLASS_INDEX_MAP is invalid: {}", e))
            })?,
            Err(_) => ClassIndexMap::default(),
        };

        Ok(DermagenConfig {
            common,
            ai_service: AiServiceConfig {
                url: env::var("AI_SERVICE_URL")
                    .unwrap_or_else(|_| DEFAULT_AI_SERVICE_URL.to_string()),
                timeout_seconds: parse_positive_env(
                    "AI_SERVICE_TIMEOUT_SECS",
                    DEFAULT_AI_TIMEOUT_SECS,
                )?,
            },
            limits: LimitsConfig {
                max_generate_count: parse_positive_env("GENERATE_MAX_COUNT", DEFAULT_MAX_COUNT)?,
                images_query_limit: parse_positive_env("IMAGES_QUERY_LIMIT", DEFAULT_QUERY_LIMIT)?,
            },
            class_index_map,
        })
    }

    /// Defaults with the given listen port and inference URL; used by tests.
    pub fn with_ai_service(port: u16, ai_service_url: impl Into<String>) -> Self {
        Self {
            common: core_config::Config {
                port,
                ..Default::default()
            },
            ai_service: AiServiceConfig {
                url: ai_service_url.into(),
                timeout_seconds: DEFAULT_AI_TIMEOUT_SECS,
            },
            limits: LimitsConfig::default(),
            class_index_map: ClassIndexMap::default(),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}

/// Like `parse_env`, but zero is a configuration error.
fn parse_positive_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = parse_env(key, default)?;
    if value == T::default() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be greater than zero",
            key
        )));
    }
    Ok(value)
}
