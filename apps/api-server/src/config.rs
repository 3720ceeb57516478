//! Application configuration loaded from environment variables.

use std::env;

use blogicum_core::ports::DEFAULT_PAGE_SIZE;
use blogicum_infra::database::DatabaseConfig;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Largest offset a client may request. Postgres takes `OFFSET` as a
/// signed 64-bit integer.
pub const MAX_OFFSET: u64 = i64::MAX as u64;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Default listing page size.
    pub posts_per_page: u64,
    /// Usernames that become staff when they register.
    pub staff_usernames: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
            {
                config.max_connections = max;
            }
            if let Some(min) = env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
            {
                config.min_connections = min;
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            posts_per_page: env::var("POSTS_PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &u64| (1..=MAX_PAGE_SIZE).contains(n))
                .unwrap_or(DEFAULT_PAGE_SIZE),
            staff_usernames: env::var("STAFF_USERNAMES")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
