use anyhow::{anyhow, Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,
    pub db: DbConfig,
}

/// Connection target for the primary store. When `cloud_sql_connection_name`
/// is set the pool connects over the `/cloudsql/<instance>` unix socket,
/// otherwise over host/port (e.g. a local cloud-sql-proxy).
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub cloud_sql_connection_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_addr: env_string("HTTP_ADDR", Some("0.0.0.0:8080".to_string()))?,
            db: DbConfig::from_env()?,
        })
    }
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_string("DB_HOST", Some("127.0.0.1".to_string()))?,
            port: env_u16("DB_PORT", Some(3308))?,
            // Credentials are required: no hardcoded fallback.
            user: env_string("DB_USER", None)?,
            password: env_string("DB_PASS", None)?,
            database: env_string("DB_NAME", Some("farmwatch".to_string()))?,
            cloud_sql_connection_name: env_optional("CLOUD_SQL_CONNECTION_NAME"),
        })
    }
}

fn env_string(key: &str, default: Option<String>) -> Result<String> {
    match env::var(key) {
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_u16(key: &str, default: Option<u16>) -> Result<u16> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid {key}")),
        Err(_) => default.ok_or_else(|| anyhow!("missing env var {key}")),
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
