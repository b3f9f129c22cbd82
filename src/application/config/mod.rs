pub mod auth;
pub mod database;
pub mod server;
pub mod storage;

use once_cell::sync::Lazy;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server: server::ServerConfig,
    pub database: database::DatabaseConfig,
    pub auth: auth::AuthConfig,
    pub storage: storage::StorageConfig,

    // Build info
    pub version: String,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: server::ServerConfig::from_env(),
            database: database::DatabaseConfig::from_env(),
            auth: auth::AuthConfig::from_env(),
            storage: storage::StorageConfig::from_env(),

            version: env!("CARGO_PKG_VERSION").to_string(),

            log_level: env::var("EDUPLAY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: LogFormat::parse(
                &env::var("EDUPLAY_LOG_FORMAT").unwrap_or_default(),
            ),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }
}
