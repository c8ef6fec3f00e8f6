use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub url: UrlConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Local connection attempted when the primary fails outside production.
    pub fallback_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlConfig {
    pub base_url: String,
    pub short_id_length: usize,
    pub short_id_max_attempts: u32,
    /// Number of recent URLs shown on the home page.
    pub recent_limit: i64,
    pub default_page_size: i64,
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let environment = match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "development" => Environment::Development,
            other => {
                return Err(AppError::Configuration(format!(
                    "Invalid APP_ENV: {} (expected development or production)",
                    other
                )))
            }
        };

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::MissingEnvVar("DATABASE_URL".to_string()))?;
        let database_fallback_url = env::var("DATABASE_FALLBACK_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/urlshortener".to_string());
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid DB_MAX_CONNECTIONS".to_string()))?;
        let db_min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid DB_MIN_CONNECTIONS".to_string()))?;
        let db_acquire_timeout = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Configuration("Invalid DB_ACQUIRE_TIMEOUT_SECONDS".to_string())
            })?;

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));
        let short_id_length = env::var("SHORT_ID_LENGTH")
            .unwrap_or_else(|_| "8".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SHORT_ID_LENGTH".to_string()))?;
        let short_id_max_attempts = env::var("SHORT_ID_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SHORT_ID_MAX_ATTEMPTS".to_string()))?;
        let recent_limit = env::var("RECENT_URLS_LIMIT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid RECENT_URLS_LIMIT".to_string()))?;
        let default_page_size = env::var("DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid DEFAULT_PAGE_SIZE".to_string()))?;
        let max_page_size = env::var("MAX_PAGE_SIZE")
            .unwrap_or_else(|_| "100".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid MAX_PAGE_SIZE".to_string()))?;

        let allowed_origins_str = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let allowed_origins: Vec<String> = if allowed_origins_str == "*" {
            vec!["*".to_string()]
        } else {
            allowed_origins_str
                .split(',')
                .map(|s| s.trim().to_string())
                .collect()
        };

        let config = Config {
            server: ServerConfig {
                host: server_host,
                port: server_port,
            },
            database: DatabaseConfig {
                url: database_url,
                fallback_url: database_fallback_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
                acquire_timeout_seconds: db_acquire_timeout,
            },
            url: UrlConfig {
                base_url,
                short_id_length,
                short_id_max_attempts,
                recent_limit,
                default_page_size,
                max_page_size,
            },
            cors: CorsConfig { allowed_origins },
            environment,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::Configuration(
                "DB_MIN_CONNECTIONS cannot be greater than DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.database.acquire_timeout_seconds == 0 {
            return Err(AppError::Configuration(
                "DB_ACQUIRE_TIMEOUT_SECONDS must be greater than 0".to_string(),
            ));
        }

        // Generated ids must match the redirect route pattern (6-10 chars)
        if self.url.short_id_length < 6 || self.url.short_id_length > 10 {
            return Err(AppError::Configuration(
                "SHORT_ID_LENGTH must be between 6 and 10".to_string(),
            ));
        }

        if self.url.short_id_max_attempts < 1 || self.url.short_id_max_attempts > 100 {
            return Err(AppError::Configuration(
                "SHORT_ID_MAX_ATTEMPTS must be between 1 and 100".to_string(),
            ));
        }

        if self.url.recent_limit < 1 {
            return Err(AppError::Configuration(
                "RECENT_URLS_LIMIT must be at least 1".to_string(),
            ));
        }

        if self.url.default_page_size < 1 || self.url.max_page_size < 1 {
            return Err(AppError::Configuration(
                "Page sizes must be at least 1".to_string(),
            ));
        }

        if self.url.default_page_size > self.url.max_page_size {
            return Err(AppError::Configuration(
                "DEFAULT_PAGE_SIZE cannot be greater than MAX_PAGE_SIZE".to_string(),
            ));
        }

        Ok(())
    }
}
