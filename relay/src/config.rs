use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub cycle_interval: Duration,
    pub probe_timeout: Duration,
    pub spool_path: PathBuf,
    pub herd_size: u32,
}

/// Remote store target, same variables the server reads. When
/// `cloud_sql_connection_name` is set the pool connects over the
/// `/cloudsql/<instance>` unix socket, otherwise over host/port.
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
        let cycle_interval = Duration::from_secs(env_u64("RELAY_INTERVAL_SECS", Some(10))?);
        let probe_timeout = Duration::from_secs(env_u64("RELAY_PROBE_TIMEOUT_SECS", Some(3))?);
        let spool_path = PathBuf::from(env_string(
            "RELAY_SPOOL_PATH",
            Some("spool/readings.jsonl".to_string()),
        )?);
        let herd_size = env_u64("RELAY_HERD_SIZE", Some(10))? as u32;
        if herd_size == 0 {
            return Err(anyhow!("RELAY_HERD_SIZE must be at least 1"));
        }

        Ok(Self {
            db: DbConfig::from_env()?,
            cycle_interval,
            probe_timeout,
            spool_path,
            herd_size,
        })
    }
}

impl DbConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_string("DB_HOST", Some("127.0.0.1".to_string()))?,
            port: env_u64("DB_PORT", Some(3308))? as u16,
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

fn env_u64(key: &str, default: Option<u64>) -> Result<u64> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
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
