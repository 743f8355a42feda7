//! Configuration loader

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::Path;
use url::Url;

use super::types::AppConfig;
use crate::common::errors::{ClientError, Result};

/// Conventional environment variables and the config keys they override
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("CAPITAL_API_KEY", "capital.api_key"),
    ("CAPITAL_LOGIN", "capital.login"),
    ("CAPITAL_PASSWORD", "capital.password"),
    ("TELEGRAM_TOKEN", "telegram.token"),
    ("TELEGRAM_CHAT_ID", "telegram.chat_id"),
];

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Bare variables (`CAPITAL_API_KEY`, `TELEGRAM_TOKEN`, ...)
/// 2. Environment variables (prefixed with APP_, `__` between sections)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    for (var, key) in ENV_OVERRIDES {
        builder = builder
            .set_override_option(*key, std::env::var(var).ok())
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
    }

    build_config(builder)
}

/// Build, deserialize and validate a prepared configuration
pub fn build_config(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig> {
    let config = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    validate(&app_config)?;
    Ok(app_config)
}

/// Reject configurations the monitor cannot start with
pub fn validate(config: &AppConfig) -> Result<()> {
    let required = [
        ("capital.api_key", &config.capital.api_key),
        ("capital.login", &config.capital.login),
        ("capital.password", &config.capital.password),
        ("telegram.token", &config.telegram.token),
        ("telegram.chat_id", &config.telegram.chat_id),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ClientError::Configuration(format!(
                "missing required value: {}",
                key
            )));
        }
    }

    for (key, value) in [
        ("capital.rest_url", &config.capital.rest_url),
        ("telegram.api_url", &config.telegram.api_url),
    ] {
        Url::parse(value)
            .map_err(|e| ClientError::Configuration(format!("invalid {}: {}", key, e)))?;
    }

    if config.settings.poll_interval_seconds == 0 {
        return Err(ClientError::Configuration(
            "settings.poll_interval_seconds must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
