use std::env;

use anyhow::{Context, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOG_FILTER: &str = "info,todo_core=debug";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Upper bound on pooled PostgreSQL connections
    pub database_max_connections: u32,
    /// Log every SQL statement through sqlx
    pub database_sql_logging: bool,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let database_sql_logging = match lookup("DATABASE_SQL_LOGGING") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("DATABASE_SQL_LOGGING is not a boolean: {raw}"))?,
            None => false,
        };

        let log_filter = lookup("LOG_FILTER")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            database_sql_logging,
            log_filter,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
